use argon2::password_hash::SaltString;
use errors::CustomError;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Length as a `VARCHAR(n)` column measures it: code points, not graphemes.
fn column_len(s: &str) -> usize {
    s.chars().count()
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex")
    })
}

const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];

/// Public display name of an account.
#[derive(Debug)]
pub struct UserName(String);

impl UserName {
    pub const MAX_LEN: usize = 256;

    pub fn parse(s: String) -> Result<UserName, CustomError> {
        if s.trim().is_empty()
            || grapheme_len(&s) > Self::MAX_LEN
            || s.chars().any(|c| FORBIDDEN_NAME_CHARS.contains(&c))
        {
            return Err(CustomError::ValidationError(format!("'{}' is not a valid username", s)));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn parse(s: String) -> Result<UserEmail, CustomError> {
        let trimmed = s.trim();
        if !email_pattern().is_match(trimmed) {
            return Err(CustomError::ValidationError(format!("'{}' is not a valid email address", s)));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for UserEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn check_password_strength(password: &str) -> Result<(), CustomError> {
    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(CustomError::ValidationError(
            "Password must be at least 8 characters and contain a letter and a digit".to_string(),
        ))
    }
}

/// Name of a genre or publisher.
#[derive(Debug)]
pub struct CatalogName(String);

impl CatalogName {
    pub const MAX_LEN: usize = 100;

    pub fn parse(s: String) -> Result<CatalogName, CustomError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CustomError::ValidationError("Name cannot be blank".to_string()));
        }
        if column_len(trimmed) > Self::MAX_LEN {
            return Err(CustomError::ValidationError(format!(
                "Name cannot be longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct PostTitle(String);

impl PostTitle {
    pub const MAX_LEN: usize = 200;

    pub fn parse(s: String) -> Result<PostTitle, CustomError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CustomError::ValidationError("Title cannot be blank".to_string()));
        }
        if column_len(trimmed) > Self::MAX_LEN {
            return Err(CustomError::ValidationError(format!(
                "Title cannot be longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct CommentBody(String);

impl CommentBody {
    pub const MAX_LEN: usize = 5000;

    pub fn parse(s: String) -> Result<CommentBody, CustomError> {
        if s.trim().is_empty() {
            return Err(CustomError::ValidationError("Comment cannot be empty".to_string()));
        }
        if grapheme_len(&s) > Self::MAX_LEN {
            return Err(CustomError::ValidationError(format!(
                "Comment cannot be longer than {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(s))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sign-up form.
#[derive(Deserialize)]
pub struct CreateUserBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserBody {
    /// Checks the name and address; the password is checked separately.
    pub fn validate(self) -> Result<(UserName, UserEmail), CustomError> {
        Ok((UserName::parse(self.username)?, UserEmail::parse(self.email)?))
    }
}

#[derive(Deserialize)]
pub struct LoginUserBody {
    pub email: String,
    pub password: String,
}

pub fn generate_random_salt() -> SaltString {
    SaltString::generate(&mut rand::thread_rng())
}
