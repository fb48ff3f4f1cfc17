use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::users;

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: String,
    pub email: &'a str,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: NaiveDateTime,
}

/// What the login check needs from a stored account.
#[derive(Queryable, Debug)]
pub struct StoredCredentials {
    pub id: Uuid,
    pub password_hash: String,
    pub is_staff: bool,
}
