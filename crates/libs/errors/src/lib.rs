use std::{error::Error, fmt::Debug};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Error)]
pub enum CustomError {
    #[error("Database Error: {msg}")]
    DatabaseError {
        msg: String,
        resp: String,
        status_code: StatusCode,
    },

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Authentication Error: {0}")]
    AuthenticationError(#[from] AuthError),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Hashing Error: {0}")]
    HashingError(String),

    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session Authentication Error: {0}")]
    SessionAuthenticationError(String),

    #[error("JWT Authentication Error: {0}")]
    JwtAuthenticationError(String),

    #[error("Invalid Session: {0}")]
    InvalidSession(anyhow::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Other Authentication Error: {0}")]
    OtherAuthenticationError(String),
}

impl CustomError {
    /// Text that is safe to show to the caller.
    fn public_message(&self) -> String {
        match self {
            CustomError::DatabaseError { resp, .. } => resp.clone(),
            CustomError::HashingError(_) | CustomError::UnexpectedError(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::DatabaseError { status_code, .. } => *status_code,
            CustomError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CustomError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            CustomError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!("{:?}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.public_message() }))
    }
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain(self, f)
    }
}

fn error_chain(source: &impl Error, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    writeln!(f, "{}", source)?;

    let mut current = source.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by: \n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
