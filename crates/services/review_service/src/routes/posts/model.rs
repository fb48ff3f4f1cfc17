use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::schema::posts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, DbEnum, Serialize, Deserialize)]
#[ExistingTypePath = "crate::schema::sql_types::PostStatus"]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub description: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub created_on: NaiveDateTime,
    pub updated_on: NaiveDateTime,
    pub developer: String,
    pub release_date: Option<NaiveDate>,
    pub platforms: Value,
    pub genre: Value,
    pub rating: Option<f64>,
    pub tags: Value,
    pub publisher_id: Option<Uuid>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub description: String,
    pub content: String,
    pub excerpt: String,
    pub status: PostStatus,
    pub created_on: NaiveDateTime,
    pub updated_on: NaiveDateTime,
    pub developer: String,
    pub release_date: Option<NaiveDate>,
    pub platforms: Value,
    pub genre: Value,
    pub rating: Option<f64>,
    pub tags: Value,
    pub publisher_id: Option<Uuid>,
}

/// Columns touched by an edit; `None` leaves a column alone.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = posts)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub updated_on: Option<NaiveDateTime>,
    pub developer: Option<String>,
    pub release_date: Option<Option<NaiveDate>>,
    pub platforms: Option<Value>,
    pub genre: Option<Value>,
    pub rating: Option<Option<f64>>,
    pub tags: Option<Value>,
    pub publisher_id: Option<Option<Uuid>>,
}

#[derive(Deserialize, Debug)]
pub struct CreatePostBody {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub developer: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Slug of the publisher to link, if any.
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdatePostBody {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub status: Option<PostStatus>,
    pub developer: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub platforms: Option<Vec<String>>,
    pub genre: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub publisher: Option<String>,
}

/// One row of the listing page.
#[derive(Serialize, Debug)]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
    pub author: String,
    pub excerpt: String,
    pub developer: String,
    pub platforms: Value,
    pub genre: Value,
    pub rating: Option<f64>,
    pub created_on: NaiveDateTime,
}

impl PostSummary {
    pub fn new(post: Post, author: String) -> Self {
        Self {
            title: post.title,
            slug: post.slug,
            author,
            excerpt: post.excerpt,
            developer: post.developer,
            platforms: post.platforms,
            genre: post.genre,
            rating: post.rating,
            created_on: post.created_on,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct ListingQuery {
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub page: Option<i64>,
}

impl ListingQuery {
    /// An empty genre counts as absent; anything else is compared as sent.
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref().filter(|s| !s.is_empty())
    }

    /// Blank publishers count as absent.
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
