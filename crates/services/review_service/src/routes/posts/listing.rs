use actix_web::{web, HttpResponse};
use anyhow::Context;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::CustomError;
use lib_config::config::configuration::{FixtureSettings, ListingSettings};
use lib_config::db::db::PgPool;
use serde::Serialize;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

use super::filter::{PostFilter, PublisherMatch};
use super::model::{ListingQuery, Post, PostSummary};
use super::pagination::Page;
use crate::db_error::DbError;
use crate::genre_index::GenreIndex;
use crate::routes::catalog::navigation::{navigation, Navigation};
use crate::routes::catalog::publishers::lookup_publisher;
use crate::schema::{posts, users};

#[derive(Serialize, Debug)]
pub struct ActiveFilters {
    pub genre: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PostListResponse {
    #[serde(flatten)]
    pub page: Page,
    pub filters: ActiveFilters,
    pub posts: Vec<PostSummary>,
    #[serde(flatten)]
    pub navigation: Navigation,
}

/// Usernames for the given author ids.
pub async fn author_names(
    conn: &mut AsyncPgConnection,
    author_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, CustomError> {
    if author_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = users::table
        .filter(users::id.eq_any(author_ids))
        .select((users::id, users::username))
        .load::<(Uuid, String)>(conn)
        .await
        .map_err(DbError)?;
    Ok(rows.into_iter().collect())
}

/// Builds the filter for a listing request: the genre step reads the fixture,
/// the publisher step looks for a stored publisher before guessing.
#[instrument(name = "Resolve listing filter", skip(conn, fixtures))]
pub async fn resolve_filter(
    conn: &mut AsyncPgConnection,
    query: &ListingQuery,
    fixtures: &FixtureSettings,
) -> Result<PostFilter, CustomError> {
    let genre_slugs = match query.genre() {
        Some(genre) => {
            let index = GenreIndex::load(&fixtures.games_path).await;
            let slugs = index.post_slugs_for(genre);
            tracing::debug!("Genre {} matches {} fixture records", genre, slugs.len());
            Some(slugs)
        }
        None => None,
    };

    let publisher = match query.publisher() {
        Some(slug) => {
            let stored = lookup_publisher(conn, slug).await?;
            Some(PublisherMatch::resolve(slug, stored))
        }
        None => None,
    };

    Ok(PostFilter {
        genre_slugs,
        publisher,
    })
}

/******************************************/
// Post listing Route
/******************************************/
/**
 * @route   GET /api/v1/posts?genre=&publisher=&page=
 * @access  Public
 */
#[instrument(name = "List posts", skip(pool, fixtures, listing))]
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<ListingQuery>,
    fixtures: web::Data<FixtureSettings>,
    listing: web::Data<ListingSettings>,
) -> Result<HttpResponse, CustomError> {
    let query = query.into_inner();
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let filter = resolve_filter(&mut conn, &query, &fixtures).await?;

    let total = if filter.matches_nothing() {
        0
    } else {
        filter
            .published_posts()
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(DbError)?
    };
    let page = Page::resolve(query.page, total, listing.page_size)?;

    let rows: Vec<Post> = if total == 0 {
        Vec::new()
    } else {
        filter
            .published_posts()
            .order((posts::created_on.desc(), posts::id.asc()))
            .offset(page.offset())
            .limit(page.limit())
            .load::<Post>(&mut conn)
            .await
            .map_err(DbError)?
    };

    let authors = author_names(&mut conn, rows.iter().map(|p| p.author_id).collect()).await?;
    let posts = rows
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id).cloned().unwrap_or_default();
            PostSummary::new(post, author)
        })
        .collect();

    let navigation = navigation(&mut conn).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        page,
        filters: ActiveFilters {
            genre: query.genre().map(str::to_string),
            publisher: query.publisher().map(str::to_string),
        },
        posts,
        navigation,
    }))
}
