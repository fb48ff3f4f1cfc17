use actix_web::{web, HttpResponse};
use anyhow::Context;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::CustomError;
use lib_config::db::db::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    name_and_slug, resolve_slug, CatalogBody, Genre, NavItem, SearchQuery, UpdateCatalogBody,
};
use crate::db_error::DbError;
use crate::schema::genres;
use crate::sql_functions::lower;

/// Every genre as a menu entry, ordered by name ignoring case.
pub async fn genre_nav(conn: &mut AsyncPgConnection) -> Result<Vec<NavItem>, CustomError> {
    let items = genres::table
        .select((genres::name, genres::slug))
        .order(lower(genres::name))
        .load::<NavItem>(conn)
        .await
        .map_err(DbError)?;
    Ok(items)
}

async fn find_genre(conn: &mut AsyncPgConnection, genre_slug: &str) -> Result<Genre, CustomError> {
    genres::table
        .filter(genres::slug.eq(genre_slug))
        .select(Genre::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(|| CustomError::NotFound(format!("Genre '{}' not found", genre_slug)))
}

/******************************************/
// Genre menu Route
/******************************************/
/**
 * @route   GET /api/v1/genres
 * @access  Public
 */
#[instrument(name = "List genres", skip(pool))]
pub async fn list_genres(pool: web::Data<PgPool>) -> Result<HttpResponse, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let items = genre_nav(&mut conn).await?;
    Ok(HttpResponse::Ok().json(items))
}

/******************************************/
// Admin: create genre Route
/******************************************/
/**
 * @route   POST /api/v1/admin/genres
 * @access  Staff
 */
#[instrument(name = "Create genre", skip(pool, body), fields(name = %body.name))]
pub async fn create_genre(
    pool: web::Data<PgPool>,
    body: web::Json<CatalogBody>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let (name, slug) = name_and_slug(body.name, body.slug)?;

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let genre = Genre {
        id: Uuid::new_v4(),
        name,
        slug,
    };
    diesel::insert_into(genres::table)
        .values(&genre)
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    tracing::info!("Created genre {}", genre.slug);
    Ok(HttpResponse::Created().json(genre))
}

/******************************************/
// Admin: search genres Route
/******************************************/
/**
 * @route   GET /api/v1/admin/genres?q=
 * @access  Staff
 */
#[instrument(name = "Search genres", skip(pool))]
pub async fn search_genres(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let mut select = genres::table
        .select(Genre::as_select())
        .order(genres::name.asc())
        .into_boxed();
    if let Some(pattern) = query.pattern() {
        select = select.filter(genres::name.ilike(pattern));
    }
    let rows = select.load::<Genre>(&mut conn).await.map_err(DbError)?;
    Ok(HttpResponse::Ok().json(rows))
}

/******************************************/
// Admin: update genre Route
/******************************************/
/**
 * @route   PATCH /api/v1/admin/genres/{slug}
 * @access  Staff
 */
#[instrument(name = "Update genre", skip(pool, body))]
pub async fn update_genre(
    pool: web::Data<PgPool>,
    genre_slug: web::Path<String>,
    body: web::Json<UpdateCatalogBody>,
) -> Result<HttpResponse, CustomError> {
    let genre_slug = genre_slug.into_inner();
    let body = body.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let mut genre = find_genre(&mut conn, &genre_slug).await?;

    match body.name {
        Some(new_name) => {
            let (name, slug) = name_and_slug(new_name, body.slug)?;
            genre.name = name;
            genre.slug = slug;
        }
        None => {
            if let Some(new_slug) = body.slug {
                genre.slug = resolve_slug(Some(new_slug), &genre.name)?;
            }
        }
    }

    diesel::update(genres::table.filter(genres::id.eq(genre.id)))
        .set(&genre)
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    Ok(HttpResponse::Ok().json(genre))
}

/******************************************/
// Admin: delete genre Route
/******************************************/
/**
 * @route   DELETE /api/v1/admin/genres/{slug}
 * @access  Staff
 */
#[instrument(name = "Delete genre", skip(pool))]
pub async fn delete_genre(
    pool: web::Data<PgPool>,
    genre_slug: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let genre_slug = genre_slug.into_inner();
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let deleted = diesel::delete(genres::table.filter(genres::slug.eq(&genre_slug)))
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    if deleted == 0 {
        return Err(CustomError::NotFound(format!("Genre '{}' not found", genre_slug)));
    }
    Ok(HttpResponse::Ok().json(format!("Deleted genre: {}", genre_slug)))
}
