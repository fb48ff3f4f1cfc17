use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::{AuthError, CustomError};
use helpers::auth_jwt::auth::Claims;
use helpers::slug::slug::slugify;
use helpers::validations::validations::PostTitle;
use lib_config::db::db::PgPool;
use lib_config::session::redis::RedisService;
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::model::{CreatePostBody, NewPost, Post, PostChanges, UpdatePostBody};
use crate::db_error::DbError;
use crate::routes::catalog::publishers::lookup_publisher;
use crate::routes::session::current_user;
use crate::schema::posts;

const MAX_POST_SLUG_LEN: usize = 200;
const MAX_DEVELOPER_LEN: usize = 100;
const MAX_RATING: f64 = 10.0;

pub fn post_slug(slug: Option<String>, title: &str) -> Result<String, CustomError> {
    let slug = match slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(given) => slugify(&given),
        None => slugify(title),
    };
    if slug.is_empty() {
        return Err(CustomError::ValidationError(
            "Slug cannot be empty; use a title with letters or digits".to_string(),
        ));
    }
    if slug.chars().count() > MAX_POST_SLUG_LEN {
        return Err(CustomError::ValidationError(format!(
            "Slug cannot be longer than {} characters",
            MAX_POST_SLUG_LEN
        )));
    }
    Ok(slug)
}

pub fn check_rating(rating: Option<f64>) -> Result<Option<f64>, CustomError> {
    match rating {
        Some(r) if !r.is_finite() || !(0.0..=MAX_RATING).contains(&r) => Err(
            CustomError::ValidationError(format!("Rating must be between 0 and {}", MAX_RATING)),
        ),
        other => Ok(other),
    }
}

pub fn check_developer(developer: String) -> Result<String, CustomError> {
    let developer = developer.trim().to_string();
    if developer.chars().count() > MAX_DEVELOPER_LEN {
        return Err(CustomError::ValidationError(format!(
            "Developer cannot be longer than {} characters",
            MAX_DEVELOPER_LEN
        )));
    }
    Ok(developer)
}

/// Free-text labels stored as a JSON array, blanks dropped.
pub fn label_list(labels: Vec<String>) -> Value {
    let labels: Vec<String> = labels
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    json!(labels)
}

/// Publisher id for a publisher slug. A blank slug means "no publisher";
/// an unknown one is rejected.
async fn publisher_id_for(
    conn: &mut AsyncPgConnection,
    publisher_slug: &str,
) -> Result<Option<Uuid>, CustomError> {
    let publisher_slug = publisher_slug.trim();
    if publisher_slug.is_empty() {
        return Ok(None);
    }
    match lookup_publisher(conn, publisher_slug).await? {
        Some(publisher) => Ok(Some(publisher.id)),
        None => Err(CustomError::ValidationError(format!(
            "Unknown publisher '{}'",
            publisher_slug
        ))),
    }
}

async fn find_own_post(
    conn: &mut AsyncPgConnection,
    post_slug: &str,
    user_id: Uuid,
) -> Result<Post, CustomError> {
    let post = posts::table
        .filter(posts::slug.eq(post_slug))
        .select(Post::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(|| CustomError::NotFound(format!("Post '{}' not found", post_slug)))?;
    if post.author_id != user_id {
        return Err(AuthError::Forbidden("Only the author may edit this post".to_string()).into());
    }
    Ok(post)
}

/******************************************/
// Create post Route
/******************************************/
/**
 * @route   POST /api/v1/auth/posts/new
 * @access  JWT Protected
 */
#[instrument(name = "Create post", skip(pool, redis_service, claims, body), fields(title = %body.title))]
pub async fn create_post(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
    body: web::Json<CreatePostBody>,
) -> Result<HttpResponse, CustomError> {
    let author_id = current_user(&claims, &redis_service).await?;
    let body = body.into_inner();

    let title = PostTitle::parse(body.title)?;
    let slug = post_slug(body.slug, title.as_ref())?;
    let rating = check_rating(body.rating)?;
    let developer = check_developer(body.developer)?;

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let publisher_id = match body.publisher {
        Some(publisher) => publisher_id_for(&mut conn, &publisher).await?,
        None => None,
    };

    let now = Utc::now().naive_utc();
    let new_post = NewPost {
        id: Uuid::new_v4(),
        title: title.as_ref().to_string(),
        slug,
        author_id,
        description: body.description,
        content: body.content,
        excerpt: body.excerpt,
        status: body.status,
        created_on: now,
        updated_on: now,
        developer,
        release_date: body.release_date,
        platforms: label_list(body.platforms),
        genre: label_list(body.genre),
        rating,
        tags: label_list(body.tags),
        publisher_id,
    };

    let post = diesel::insert_into(posts::table)
        .values(&new_post)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(DbError)?;

    tracing::info!("Post {} created by {}", post.slug, author_id);
    Ok(HttpResponse::Created().json(post))
}

/******************************************/
// Update post Route
/******************************************/
/**
 * @route   PATCH /api/v1/auth/posts/{slug}
 * @access  JWT Protected (author only)
 */
#[instrument(name = "Update post", skip(pool, redis_service, claims, body))]
pub async fn update_post(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
    post_slug_path: web::Path<String>,
    body: web::Json<UpdatePostBody>,
) -> Result<HttpResponse, CustomError> {
    let user_id = current_user(&claims, &redis_service).await?;
    let post_slug_path = post_slug_path.into_inner();
    let body = body.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let post = find_own_post(&mut conn, &post_slug_path, user_id).await?;

    let mut changes = PostChanges {
        updated_on: Some(Utc::now().naive_utc()),
        ..Default::default()
    };
    if let Some(title) = body.title {
        changes.title = Some(PostTitle::parse(title)?.as_ref().to_string());
    }
    if let Some(slug) = body.slug {
        let title = changes.title.as_deref().unwrap_or(&post.title);
        changes.slug = Some(post_slug(Some(slug), title)?);
    }
    changes.description = body.description;
    changes.content = body.content;
    changes.excerpt = body.excerpt;
    changes.status = body.status;
    if let Some(developer) = body.developer {
        changes.developer = Some(check_developer(developer)?);
    }
    if let Some(release_date) = body.release_date {
        changes.release_date = Some(Some(release_date));
    }
    if let Some(rating) = body.rating {
        changes.rating = Some(check_rating(Some(rating))?);
    }
    changes.platforms = body.platforms.map(label_list);
    changes.genre = body.genre.map(label_list);
    changes.tags = body.tags.map(label_list);
    if let Some(publisher) = body.publisher {
        changes.publisher_id = Some(publisher_id_for(&mut conn, &publisher).await?);
    }

    let updated = diesel::update(posts::table.filter(posts::id.eq(post.id)))
        .set(&changes)
        .returning(Post::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(DbError)?;

    Ok(HttpResponse::Ok().json(updated))
}

/******************************************/
// My posts Route
/******************************************/
/**
 * @route   GET /api/v1/auth/posts/mine
 * @access  JWT Protected
 */
#[instrument(name = "List my posts", skip(pool, redis_service, claims))]
pub async fn my_posts(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, CustomError> {
    let user_id = current_user(&claims, &redis_service).await?;
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let rows = posts::table
        .filter(posts::author_id.eq(user_id))
        .order(posts::created_on.desc())
        .select(Post::as_select())
        .load::<Post>(&mut conn)
        .await
        .map_err(DbError)?;
    Ok(HttpResponse::Ok().json(rows))
}
