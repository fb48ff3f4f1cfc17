use actix_web::{web, HttpResponse};
use anyhow::Context;
use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use errors::CustomError;
use helpers::auth_jwt::auth::{create_jwt, Claims, Role};
use helpers::validations::validations::{
    check_password_strength, generate_random_salt, CreateUserBody, LoginUserBody,
};
use lib_config::config::configuration::JwtSettings;
use lib_config::db::db::PgPool;
use lib_config::session::redis::RedisService;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::model::{NewUser, UserResponse};
use super::validate_user::validate_credentials;
use crate::db_error::DbError;
use crate::schema::users;

/// Issues a token for the user and records its session.
async fn start_session(
    user_id: Uuid,
    role: Role,
    jwt: &JwtSettings,
    redis_service: &RedisService,
) -> Result<String, CustomError> {
    let (token, sid) = create_jwt(&user_id.to_string(), role, &jwt.secret, jwt.expiry_hours)?;
    redis_service.set_session(&sid, &user_id.to_string()).await?;
    Ok(token)
}

/******************************************/
// Registering user Route
/******************************************/
/**
 * @route   POST /api/v1/users/register
 * @access  Public
 */
#[instrument(name = "Register a new user", skip(req_user, pool, redis_service, jwt), fields(username = %req_user.username, email = %req_user.email))]
pub async fn register_user(
    pool: web::Data<PgPool>,
    req_user: web::Json<CreateUserBody>,
    redis_service: web::Data<RedisService>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, CustomError> {
    let user_data = req_user.into_inner();
    let user_password = user_data.password.clone();
    let (validated_name, validated_email) = user_data.validate()?;
    check_password_strength(&user_password)?;

    let salt = generate_random_salt();
    let password_hashed = Argon2::default()
        .hash_password(user_password.as_bytes(), &salt)
        .map_err(|err| CustomError::HashingError(err.to_string()))?;

    let mut conn = pool
        .get()
        .await
        .context("Failed to fetch connection from pool")?;

    let new_user = NewUser {
        id: Uuid::new_v4(),
        username: validated_name.as_ref(),
        password_hash: password_hashed.to_string(),
        email: validated_email.as_ref(),
        is_staff: false,
        created_at: Utc::now().naive_utc(),
    };
    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(UserResponse::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(DbError)?;

    let token = start_session(user.id, Role::Reader, &jwt, &redis_service).await?;
    tracing::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "user": user,
        "token": token
    })))
}

/******************************************/
// Login Route
/******************************************/
/**
 * @route   POST /api/v1/users/login
 * @access  Public
 */
#[instrument(name = "Login a user", skip(req_login, pool, redis_service, jwt), fields(email = %req_login.email))]
pub async fn login_user(
    pool: web::Data<PgPool>,
    req_login: web::Json<LoginUserBody>,
    redis_service: web::Data<RedisService>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, CustomError> {
    let account = validate_credentials(&pool, &req_login.into_inner()).await?;
    let role = Role::from_staff_flag(account.is_staff);
    let token = start_session(account.id, role, &jwt, &redis_service).await?;
    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}

/******************************************/
// Logout user Route
/******************************************/
/**
 * @route   POST /api/v1/user/protected/logout
 * @access  JWT Protected
 */
#[instrument(name = "Logout a user", skip(redis_service, claims))]
pub async fn logout_user(
    redis_service: web::Data<RedisService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, CustomError> {
    let session_id = claims.into_inner().sid;
    redis_service.delete_session(&session_id).await?;
    Ok(HttpResponse::Ok().json("Logout successful"))
}
