use actix_web::http::StatusCode;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use errors::CustomError;
use std::ops::Deref;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct DbError(#[from] pub DieselError);

impl Deref for DbError {
    type Target = DieselError;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DbError> for CustomError {
    fn from(value: DbError) -> Self {
        diesel_db_response_error(&value)
    }
}

fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("unique_username") => "Username has already been taken",
        Some("unique_email") => "Account already associated with this email",
        Some("unique_post_title") => "A post with this title already exists",
        Some("unique_post_slug") => "A post with this slug already exists",
        Some(name) if name.starts_with("unique_genre") => "A genre with this name or slug already exists",
        Some(name) if name.starts_with("unique_publisher") => {
            "A publisher with this name or slug already exists"
        }
        _ => "Duplicate value",
    }
}

fn diesel_db_response_error(err: &DieselError) -> CustomError {
    let (resp, status_code) = match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => (
            unique_violation_message(info.constraint_name()),
            StatusCode::CONFLICT,
        ),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            ("Referenced record does not exist", StatusCode::BAD_REQUEST)
        }
        DieselError::NotFound => ("Record not found", StatusCode::NOT_FOUND),
        _ => ("Internal server error", StatusCode::INTERNAL_SERVER_ERROR),
    };

    CustomError::DatabaseError {
        msg: format!("Database error occurred: {:?}", err),
        resp: resp.to_string(),
        status_code,
    }
}
