use diesel::prelude::*;
use errors::CustomError;
use helpers::slug::slug::slugify;
use helpers::validations::validations::CatalogName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{genres, publishers};

pub const MAX_SLUG_LEN: usize = 110;

#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = genres)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = publishers)]
pub struct Publisher {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Name/slug pair shown in navigation menus.
#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub name: String,
    pub slug: String,
}

#[derive(Deserialize, Debug)]
pub struct CatalogBody {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCatalogBody {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// `ILIKE` pattern for a name search, with the user's wildcards escaped.
    pub fn pattern(&self) -> Option<String> {
        let term = self.q.as_deref()?.trim();
        if term.is_empty() {
            return None;
        }
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escaped))
    }
}

/// Validates a name and settles the slug: the given one if non-blank,
/// otherwise one derived from the name.
pub fn name_and_slug(name: String, slug: Option<String>) -> Result<(String, String), CustomError> {
    let name = CatalogName::parse(name)?;
    let slug = resolve_slug(slug, name.as_ref())?;
    Ok((name.as_ref().to_string(), slug))
}

pub fn resolve_slug(slug: Option<String>, name: &str) -> Result<String, CustomError> {
    let slug = match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(given) => slugify(&given),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(CustomError::ValidationError(
            "Slug cannot be empty; use a name with letters or digits".to_string(),
        ));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CustomError::ValidationError(format!(
            "Slug cannot be longer than {} characters",
            MAX_SLUG_LEN
        )));
    }
    Ok(slug)
}
