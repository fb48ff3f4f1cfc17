use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static regex"))
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").expect("static regex"))
}

/// Turns display text into a URL-safe identifier.
///
/// Accents are folded to ASCII and any other non-ASCII character is dropped.
/// Everything except letters, digits, underscores, hyphens and whitespace is
/// removed, runs of whitespace and hyphens collapse to a single hyphen, and
/// leading or trailing hyphens and underscores are trimmed.
/// `"Action / Adventure"` becomes `"action-adventure"`.
pub fn slugify(value: &str) -> String {
    let ascii: String = value.nfkd().filter(char::is_ascii).collect();
    let lowered = ascii.to_lowercase();
    let cleaned = disallowed().replace_all(&lowered, "");
    separators()
        .replace_all(cleaned.trim(), "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string()
}

/// Best-effort display name recovered from a slug: `"electronic-arts"` → `"electronic arts"`.
pub fn name_from_slug(slug: &str) -> String {
    slug.replace('-', " ")
}
