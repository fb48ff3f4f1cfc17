use actix_web::{web, HttpResponse};
use anyhow::Context;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use errors::CustomError;
use lib_config::db::db::PgPool;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use super::model::Comment;
use crate::db_error::DbError;
use crate::schema::{comments, posts, users};

/// A comment waiting in the moderation queue.
#[derive(Queryable, Serialize, Debug)]
pub struct PendingComment {
    pub id: Uuid,
    pub post_slug: String,
    pub author: String,
    pub body: String,
    pub created_on: NaiveDateTime,
}

/******************************************/
// Admin: pending comments Route
/******************************************/
/**
 * @route   GET /api/v1/admin/comments/pending
 * @access  Staff
 */
#[instrument(name = "List pending comments", skip(pool))]
pub async fn pending_comments(pool: web::Data<PgPool>) -> Result<HttpResponse, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let rows = comments::table
        .inner_join(posts::table)
        .inner_join(users::table)
        .filter(comments::approved.eq(false))
        .order((comments::created_on.asc(), comments::id.asc()))
        .select((
            comments::id,
            posts::slug,
            users::username,
            comments::body,
            comments::created_on,
        ))
        .load::<PendingComment>(&mut conn)
        .await
        .map_err(DbError)?;
    Ok(HttpResponse::Ok().json(rows))
}

/******************************************/
// Admin: approve comment Route
/******************************************/
/**
 * @route   POST /api/v1/admin/comments/{comment_id}/approve
 * @access  Staff
 */
#[instrument(name = "Approve comment", skip(pool))]
pub async fn approve_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = comment_id.into_inner();
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let comment = diesel::update(comments::table.filter(comments::id.eq(comment_id)))
        .set(comments::approved.eq(true))
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(|| CustomError::NotFound(format!("Comment {} not found", comment_id)))?;

    tracing::info!("Approved comment {}", comment.id);
    Ok(HttpResponse::Ok().json(comment))
}
