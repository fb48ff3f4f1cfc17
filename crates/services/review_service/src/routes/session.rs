use errors::{AuthError, CustomError};
use helpers::auth_jwt::auth::Claims;
use lib_config::session::notice::Notice;
use lib_config::session::redis::RedisService;
use uuid::Uuid;

/// The signed-in user behind `claims`, provided their session is still live.
pub async fn current_user(claims: &Claims, redis_service: &RedisService) -> Result<Uuid, CustomError> {
    let session_user = redis_service.get_user_from_session(&claims.sid).await?;
    let user_id = claims.user_id()?;
    if session_user != user_id.to_string() {
        return Err(AuthError::InvalidSession(anyhow::anyhow!("Session belongs to another user")).into());
    }
    Ok(user_id)
}

/// Keeps optional claims only while their session is live; anything else reads as anonymous.
pub async fn live_claims(claims: Option<Claims>, redis_service: &RedisService) -> Option<Claims> {
    let claims = claims?;
    match redis_service.get_session(&claims.sid).await {
        Ok(Some(user)) if user == claims.sub => Some(claims),
        Ok(_) => None,
        Err(e) => {
            tracing::error!("Failed to read session: {:?}", e);
            None
        }
    }
}

/// Queues a notice for the session; a storage failure is logged, not returned.
pub async fn notify(redis_service: &RedisService, claims: &Claims, notice: Notice) {
    if let Err(e) = redis_service.push_notice(&claims.sid, &notice).await {
        tracing::error!("Failed to store notice {:?}: {:?}", notice, e);
    }
}
