use actix_web::{web, HttpResponse};
use anyhow::Context;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::CustomError;
use lib_config::db::db::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    name_and_slug, resolve_slug, CatalogBody, NavItem, Publisher, SearchQuery, UpdateCatalogBody,
};
use crate::db_error::DbError;
use crate::schema::publishers;
use crate::sql_functions::lower;

/// Every publisher as a menu entry, ordered by name ignoring case.
pub async fn publisher_nav(conn: &mut AsyncPgConnection) -> Result<Vec<NavItem>, CustomError> {
    let items = publishers::table
        .select((publishers::name, publishers::slug))
        .order(lower(publishers::name))
        .load::<NavItem>(conn)
        .await
        .map_err(DbError)?;
    Ok(items)
}

/// Publisher with this slug, if one is stored.
pub async fn lookup_publisher(
    conn: &mut AsyncPgConnection,
    publisher_slug: &str,
) -> Result<Option<Publisher>, CustomError> {
    let publisher = publishers::table
        .filter(publishers::slug.eq(publisher_slug))
        .select(Publisher::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(DbError)?;
    Ok(publisher)
}

pub async fn find_publisher(
    conn: &mut AsyncPgConnection,
    publisher_slug: &str,
) -> Result<Publisher, CustomError> {
    lookup_publisher(conn, publisher_slug)
        .await?
        .ok_or_else(|| CustomError::NotFound(format!("Publisher '{}' not found", publisher_slug)))
}

/******************************************/
// Publisher menu Route
/******************************************/
/**
 * @route   GET /api/v1/publishers
 * @access  Public
 */
#[instrument(name = "List publishers", skip(pool))]
pub async fn list_publishers(pool: web::Data<PgPool>) -> Result<HttpResponse, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let items = publisher_nav(&mut conn).await?;
    Ok(HttpResponse::Ok().json(items))
}

/******************************************/
// Admin: create publisher Route
/******************************************/
/**
 * @route   POST /api/v1/admin/publishers
 * @access  Staff
 */
#[instrument(name = "Create publisher", skip(pool, body), fields(name = %body.name))]
pub async fn create_publisher(
    pool: web::Data<PgPool>,
    body: web::Json<CatalogBody>,
) -> Result<HttpResponse, CustomError> {
    let body = body.into_inner();
    let (name, slug) = name_and_slug(body.name, body.slug)?;

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let publisher = Publisher {
        id: Uuid::new_v4(),
        name,
        slug,
    };
    diesel::insert_into(publishers::table)
        .values(&publisher)
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    tracing::info!("Created publisher {}", publisher.slug);
    Ok(HttpResponse::Created().json(publisher))
}

/******************************************/
// Admin: search publishers Route
/******************************************/
/**
 * @route   GET /api/v1/admin/publishers?q=
 * @access  Staff
 */
#[instrument(name = "Search publishers", skip(pool))]
pub async fn search_publishers(
    pool: web::Data<PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let mut select = publishers::table
        .select(Publisher::as_select())
        .order(publishers::name.asc())
        .into_boxed();
    if let Some(pattern) = query.pattern() {
        select = select.filter(publishers::name.ilike(pattern));
    }
    let rows = select.load::<Publisher>(&mut conn).await.map_err(DbError)?;
    Ok(HttpResponse::Ok().json(rows))
}

/******************************************/
// Admin: update publisher Route
/******************************************/
/**
 * @route   PATCH /api/v1/admin/publishers/{slug}
 * @access  Staff
 */
#[instrument(name = "Update publisher", skip(pool, body))]
pub async fn update_publisher(
    pool: web::Data<PgPool>,
    publisher_slug: web::Path<String>,
    body: web::Json<UpdateCatalogBody>,
) -> Result<HttpResponse, CustomError> {
    let publisher_slug = publisher_slug.into_inner();
    let body = body.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let mut publisher = find_publisher(&mut conn, &publisher_slug).await?;

    match body.name {
        Some(new_name) => {
            let (name, slug) = name_and_slug(new_name, body.slug)?;
            publisher.name = name;
            publisher.slug = slug;
        }
        None => {
            if let Some(new_slug) = body.slug {
                publisher.slug = resolve_slug(Some(new_slug), &publisher.name)?;
            }
        }
    }

    diesel::update(publishers::table.filter(publishers::id.eq(publisher.id)))
        .set(&publisher)
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    Ok(HttpResponse::Ok().json(publisher))
}

/******************************************/
// Admin: delete publisher Route
/******************************************/
/**
 * @route   DELETE /api/v1/admin/publishers/{slug}
 * @access  Staff
 */
#[instrument(name = "Delete publisher", skip(pool))]
pub async fn delete_publisher(
    pool: web::Data<PgPool>,
    publisher_slug: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let publisher_slug = publisher_slug.into_inner();
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let deleted = diesel::delete(publishers::table.filter(publishers::slug.eq(&publisher_slug)))
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    if deleted == 0 {
        return Err(CustomError::NotFound(format!("Publisher '{}' not found", publisher_slug)));
    }
    Ok(HttpResponse::Ok().json(format!("Deleted publisher: {}", publisher_slug)))
}
