//! Genre lookup backed by the games fixture file.
//!
//! `Post.genre` is free-form JSON, so genre filtering goes through the
//! fixture instead: each record names a post slug and the genres it belongs
//! to. The file is read on every lookup and never written.

use helpers::slug::slug::slugify;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct FixtureRecord {
    #[serde(default)]
    pub fields: FixtureFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct FixtureFields {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub genre: Option<GenreField>,
}

/// A record's genre: one tag or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenreField {
    Many(Vec<Value>),
    One(Value),
}

/// Empty and zero-like genre values carry no tags.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Tag text the way the fixture's producer prints values: `null` is `None`,
/// booleans are `True`/`False`, containers use repr form.
fn tag_text(tag: &Value) -> String {
    match tag {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", k, repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
    }
}

fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => tag_text(other),
    }
}

impl GenreField {
    /// Slugified tags of this field, in fixture order. A blank scalar has none;
    /// every list entry counts, `null` included.
    pub fn slugs(&self) -> Vec<String> {
        let tags: Vec<&Value> = match self {
            GenreField::Many(items) => items.iter().collect(),
            GenreField::One(item) if is_blank(item) => Vec::new(),
            GenreField::One(item) => vec![item],
        };
        tags.into_iter().map(|tag| slugify(&tag_text(tag))).collect()
    }
}

#[derive(Debug, Default)]
pub struct GenreIndex {
    records: Vec<FixtureRecord>,
}

impl GenreIndex {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        // Entries that aren't record-shaped are skipped rather than failing the file.
        let entries: Vec<Value> = serde_json::from_str(raw)?;
        let records = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<FixtureRecord>(entry).ok())
            .collect();
        Ok(Self { records })
    }

    /// Reads the fixture at `path`. A missing or malformed file gives an empty index.
    #[instrument(name = "Load genre fixture", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let raw = match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Genre fixture unreadable, treating as empty: {}", e);
                return Self::default();
            }
        };
        match Self::from_json(&raw) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!("Genre fixture is not valid JSON, treating as empty: {}", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Slugs of every record tagged with `genre_slug`.
    pub fn post_slugs_for(&self, genre_slug: &str) -> HashSet<String> {
        self.records
            .iter()
            .filter_map(|record| {
                let fields = &record.fields;
                let slug = fields.slug.as_ref()?;
                let genre = fields.genre.as_ref()?;
                genre
                    .slugs()
                    .iter()
                    .any(|tag| tag == genre_slug)
                    .then(|| slug.clone())
            })
            .collect()
    }
}
