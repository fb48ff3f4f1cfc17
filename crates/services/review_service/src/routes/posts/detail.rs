use actix_web::{web, HttpRequest, HttpResponse};
use anyhow::Context;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use errors::CustomError;
use lib_config::config::configuration::JwtSettings;
use lib_config::db::db::PgPool;
use lib_config::session::notice::Notice;
use lib_config::session::redis::RedisService;
use middleware::jwt::optional_claims;
use serde::Serialize;
use tracing::instrument;

use super::model::{Post, PostStatus};
use crate::db_error::DbError;
use crate::routes::catalog::navigation::{navigation, Navigation};
use crate::routes::comments::model::{approved_count, visible_comments, Comment, CommentView};
use crate::routes::session::live_claims;
use crate::schema::{comments, posts, users};

#[derive(Serialize, Debug)]
pub struct PostDetailResponse {
    pub post: Post,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub comment_count: usize,
    pub notices: Vec<Notice>,
    #[serde(flatten)]
    pub navigation: Navigation,
}

pub async fn find_published_post(
    conn: &mut AsyncPgConnection,
    post_slug: &str,
) -> Result<Post, CustomError> {
    posts::table
        .filter(posts::status.eq(PostStatus::Published))
        .filter(posts::slug.eq(post_slug))
        .select(Post::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(|| CustomError::NotFound(format!("No published post '{}'", post_slug)))
}

/// Comments on a post with their authors' names, newest first.
pub async fn comments_for(
    conn: &mut AsyncPgConnection,
    post: &Post,
) -> Result<Vec<(Comment, String)>, CustomError> {
    let rows = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq(post.id))
        .order((comments::created_on.desc(), comments::id.asc()))
        .select((Comment::as_select(), users::username))
        .load::<(Comment, String)>(conn)
        .await
        .map_err(DbError)?;
    Ok(rows)
}

/******************************************/
// Post detail Route
/******************************************/
/**
 * @route   GET /api/v1/posts/{slug}
 * @access  Public (a token with a live session adds the reader's pending comments and notices)
 */
#[instrument(name = "Post detail", skip(req, pool, jwt, redis_service))]
pub async fn post_detail(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    post_slug: web::Path<String>,
    jwt: web::Data<JwtSettings>,
    redis_service: web::Data<RedisService>,
) -> Result<HttpResponse, CustomError> {
    let post_slug = post_slug.into_inner();
    let claims = live_claims(optional_claims(&req, &jwt), &redis_service).await;

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let post = find_published_post(&mut conn, &post_slug).await?;
    let author = users::table
        .filter(users::id.eq(post.author_id))
        .select(users::username)
        .first::<String>(&mut conn)
        .await
        .map_err(DbError)?;

    let rows = comments_for(&mut conn, &post).await?;
    let comment_count = approved_count(&rows);
    let viewer = claims.as_ref().and_then(|c| c.user_id().ok());
    let comments = visible_comments(rows, viewer);

    let notices = match &claims {
        Some(claims) => redis_service.take_notices(&claims.sid).await.unwrap_or_else(|e| {
            tracing::error!("Failed to read notices: {:?}", e);
            Vec::new()
        }),
        None => Vec::new(),
    };

    let navigation = navigation(&mut conn).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post,
        author,
        comments,
        comment_count,
        notices,
        navigation,
    }))
}
