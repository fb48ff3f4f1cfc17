use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::CustomError;
use helpers::auth_jwt::auth::Claims;
use helpers::validations::validations::CommentBody;
use lib_config::db::db::PgPool;
use lib_config::session::notice::Notice;
use lib_config::session::redis::RedisService;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    plan_delete, plan_edit, Comment, CommentForm, NewComment, DELETED, SUBMITTED, UPDATED,
};
use crate::db_error::DbError;
use crate::routes::posts::detail::find_published_post;
use crate::routes::session::{current_user, notify};
use crate::schema::comments;

/// Sends the browser back to the post's detail page.
pub fn back_to_post(post_slug: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, format!("/api/v1/posts/{}", post_slug)))
        .finish()
}

/// The comment with this id on the given post.
async fn find_comment_on(
    conn: &mut AsyncPgConnection,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, CustomError> {
    comments::table
        .filter(comments::id.eq(comment_id))
        .filter(comments::post_id.eq(post_id))
        .select(Comment::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(|| CustomError::NotFound(format!("Comment {} not found", comment_id)))
}

/******************************************/
// Submit comment Route
/******************************************/
/**
 * @route   POST /api/v1/auth/comments/{slug}
 * @access  JWT Protected
 */
#[instrument(name = "Submit comment", skip(pool, redis_service, claims, form))]
pub async fn submit_comment(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
    post_slug: web::Path<String>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, CustomError> {
    let author_id = current_user(&claims, &redis_service).await?;
    let post_slug = post_slug.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let post = find_published_post(&mut conn, &post_slug).await?;

    let body = match CommentBody::parse(form.into_inner().body) {
        Ok(body) => body,
        Err(e) => {
            tracing::info!("Ignored invalid comment on {}: {:?}", post_slug, e);
            return Ok(back_to_post(&post_slug));
        }
    };

    let comment = NewComment::pending(post.id, author_id, body, Utc::now().naive_utc());
    diesel::insert_into(comments::table)
        .values(&comment)
        .execute(&mut conn)
        .await
        .map_err(DbError)?;

    notify(&redis_service, &claims, Notice::success(SUBMITTED)).await;
    Ok(back_to_post(&post_slug))
}

/******************************************/
// Edit comment Route
/******************************************/
/**
 * @route   POST /api/v1/auth/comments/{slug}/{comment_id}/edit
 * @access  JWT Protected (author only)
 */
#[instrument(name = "Edit comment", skip(pool, redis_service, claims, form))]
pub async fn edit_comment(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
    path: web::Path<(String, Uuid)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, CustomError> {
    let user_id = current_user(&claims, &redis_service).await?;
    let (post_slug, comment_id) = path.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let post = find_published_post(&mut conn, &post_slug).await?;
    let comment = find_comment_on(&mut conn, post.id, comment_id).await?;

    match plan_edit(&comment, user_id, form.into_inner().body) {
        Ok(edit) => {
            diesel::update(comments::table.filter(comments::id.eq(comment.id)))
                .set(&edit)
                .execute(&mut conn)
                .await
                .map_err(DbError)?;
            notify(&redis_service, &claims, Notice::success(UPDATED)).await;
        }
        Err(notice) => notify(&redis_service, &claims, notice).await,
    }
    Ok(back_to_post(&post_slug))
}

/******************************************/
// Delete comment Route
/******************************************/
/**
 * @route   POST /api/v1/auth/comments/{slug}/{comment_id}/delete
 * @access  JWT Protected (author only)
 */
#[instrument(name = "Delete comment", skip(pool, redis_service, claims))]
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, CustomError> {
    let user_id = current_user(&claims, &redis_service).await?;
    let (post_slug, comment_id) = path.into_inner();

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;
    let post = find_published_post(&mut conn, &post_slug).await?;
    let comment = find_comment_on(&mut conn, post.id, comment_id).await?;

    match plan_delete(&comment, user_id) {
        Ok(()) => {
            diesel::delete(comments::table.filter(comments::id.eq(comment.id)))
                .execute(&mut conn)
                .await
                .map_err(DbError)?;
            notify(&redis_service, &claims, Notice::success(DELETED)).await;
        }
        Err(notice) => notify(&redis_service, &claims, notice).await,
    }
    Ok(back_to_post(&post_slug))
}
