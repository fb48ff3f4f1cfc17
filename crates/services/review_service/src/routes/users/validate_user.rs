use anyhow::Context;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use errors::{AuthError, CustomError};
use helpers::validations::validations::LoginUserBody;
use lib_config::db::db::PgPool;
use tracing::instrument;
use utils::telemetry::spawn_blocking_with_tracing;

use super::model::StoredCredentials;
use crate::db_error::DbError;
use crate::schema::users;

fn invalid_credentials() -> CustomError {
    AuthError::OtherAuthenticationError("Invalid email or password".to_string()).into()
}

#[instrument(name = "Get stored credentials", skip(user_email, pool), fields(email = %user_email))]
async fn get_stored_credentials(
    user_email: &str,
    pool: &PgPool,
) -> Result<StoredCredentials, CustomError> {
    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    users::table
        .filter(users::email.eq(user_email))
        .select((users::id, users::password_hash, users::is_staff))
        .first::<StoredCredentials>(&mut conn)
        .await
        .optional()
        .map_err(DbError)?
        .ok_or_else(invalid_credentials)
}

#[instrument(name = "Verify password", skip(expected_hash, candidate))]
fn verify_password(expected_hash: &str, candidate: String) -> Result<bool, CustomError> {
    let expected = PasswordHash::new(expected_hash)
        .map_err(|e| CustomError::HashingError(format!("Stored hash is unreadable: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &expected)
        .is_ok())
}

/// Checks a login attempt; on success returns the account's id and staff flag.
#[instrument(name = "Validate credentials", skip(req_login, pool), fields(email = %req_login.email))]
pub async fn validate_credentials(
    pool: &PgPool,
    req_login: &LoginUserBody,
) -> Result<StoredCredentials, CustomError> {
    let stored = get_stored_credentials(&req_login.email, pool).await?;

    let expected_hash = stored.password_hash.clone();
    let entered_password = req_login.password.to_owned();
    let is_valid = spawn_blocking_with_tracing(move || verify_password(&expected_hash, entered_password))
        .await
        .context("Password verification task failed")??;

    if is_valid {
        Ok(stored)
    } else {
        Err(invalid_credentials())
    }
}
