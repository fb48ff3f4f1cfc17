use anyhow::Context;
use deadpool_redis::{Config, Connection, Pool};
use errors::{AuthError, CustomError};
use redis::AsyncCommands;
use std::sync::Arc;

use super::notice::Notice;

const SESSION_TTL_SECONDS: usize = 3600;

#[derive(Clone)]
pub struct RedisService {
    pub pool: Arc<Pool>,
}

fn notice_key(session_id: &str) -> String {
    format!("notices:{}", session_id)
}

fn take_notices_pipeline(key: &str) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic().lrange(key, 0, -1).del(key).ignore();
    pipe
}

impl RedisService {
    pub fn new(redis_url: String) -> Result<RedisService, anyhow::Error> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool()
            .context("Failed to create Redis pool")?;
        Ok(RedisService {
            pool: Arc::new(pool),
        })
    }

    pub async fn get_connection(&self) -> Result<Connection, CustomError> {
        let conn = self.pool.get().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection: {:?}", e);
            anyhow::anyhow!("Redis connection failed")
        })?;
        Ok(conn)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<String>, CustomError> {
        let mut con = self.get_connection().await?;
        let user_id: Option<String> = con
            .hget(session_id, "user_id")
            .await
            .context("Failed to read session")?;
        Ok(user_id)
    }

    pub async fn set_session(&self, session_id: &str, user_id: &str) -> Result<(), CustomError> {
        let mut con = self.get_connection().await?;
        con.hset::<_, _, _, ()>(session_id, "user_id", user_id)
            .await
            .context("Failed to set session")?;
        con.expire::<_, ()>(session_id, SESSION_TTL_SECONDS)
            .await
            .context("Failed to set session expiry")?;
        Ok(())
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<(), CustomError> {
        let mut con = self.get_connection().await?;
        con.del::<_, ()>(&[session_id.to_string(), notice_key(session_id)][..])
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    pub async fn get_user_from_session(&self, sid: &str) -> Result<String, CustomError> {
        match self.get_session(sid).await? {
            Some(id_user) => Ok(id_user),
            None => Err(AuthError::InvalidSession(anyhow::anyhow!(
                "Failed to get user for session"
            ))
            .into()),
        }
    }

    /******************************************/
    // Transient notices
    /******************************************/
    pub async fn push_notice(&self, session_id: &str, notice: &Notice) -> Result<(), CustomError> {
        let key = notice_key(session_id);
        let encoded = notice.encode().context("Failed to encode notice")?;
        let mut con = self.get_connection().await?;
        con.rpush::<_, _, ()>(&key, encoded)
            .await
            .context("Failed to store notice")?;
        con.expire::<_, ()>(&key, SESSION_TTL_SECONDS)
            .await
            .context("Failed to set notice expiry")?;
        Ok(())
    }

    /// Returns and clears every pending notice for the session in one
    /// MULTI/EXEC, so a notice pushed meanwhile is either returned or kept.
    pub async fn take_notices(&self, session_id: &str) -> Result<Vec<Notice>, CustomError> {
        let key = notice_key(session_id);
        let mut con = self.get_connection().await?;
        let (raw,): (Vec<String>,) = take_notices_pipeline(&key)
            .query_async(&mut con)
            .await
            .context("Failed to read notices")?;
        Ok(Notice::decode_all(raw))
    }
}
