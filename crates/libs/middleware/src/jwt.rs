use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, Error, HttpMessage, HttpRequest};
use actix_web_lab::middleware::Next;
use helpers::auth_jwt::auth::{verify_jwt, Claims, Role};
use lib_config::config::configuration::JwtSettings;
use lib_config::session::redis::RedisService;

/// Bearer token from the `Authorization` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, Error> {
    let jwt = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| ErrorInternalServerError("JWT settings missing"))?;
    let token = bearer_token(req.headers()).ok_or_else(|| ErrorUnauthorized("Missing token"))?;
    verify_jwt(&token, &jwt.secret).map_err(|err| {
        tracing::debug!("Rejected token: {:?}", err);
        ErrorUnauthorized("Invalid token")
    })
}

/// A token is only good while its Redis session still names the same user.
fn check_session(session_user: Option<String>, claims: &Claims) -> Result<(), Error> {
    match session_user {
        Some(user) if user == claims.sub => Ok(()),
        Some(_) => Err(ErrorUnauthorized("Session belongs to another user")),
        None => Err(ErrorUnauthorized("Session expired or logged out")),
    }
}

async fn authenticate_session(req: &ServiceRequest) -> Result<Claims, Error> {
    let claims = authenticate(req)?;
    let redis_service = req
        .app_data::<web::Data<RedisService>>()
        .ok_or_else(|| ErrorInternalServerError("Session store missing"))?;
    let session_user = redis_service.get_session(&claims.sid).await?;
    check_session(session_user, &claims)?;
    Ok(claims)
}

/// Admits any request carrying a valid token with a live session and exposes its [`Claims`].
pub async fn jwt_auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let claims = authenticate_session(&req).await?;
    req.extensions_mut().insert(claims);
    next.call(req).await
}

/// Like [`jwt_auth_middleware`] but only for tokens whose role is `T::role_allowed()`.
pub async fn role_auth_middleware<T: RoleRestrictor>(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let claims = authenticate_session(&req).await?;
    if claims.role != T::role_allowed() {
        return Err(ErrorUnauthorized("Invalid role"));
    }
    req.extensions_mut().insert(claims);
    next.call(req).await
}

pub trait RoleRestrictor {
    fn role_allowed() -> Role;
}

pub struct StaffOnly;

impl RoleRestrictor for StaffOnly {
    fn role_allowed() -> Role {
        Role::Staff
    }
}

/// Claims for public routes that behave differently for signed-in readers.
/// A missing or invalid token is treated as anonymous.
pub fn optional_claims(req: &HttpRequest, jwt: &JwtSettings) -> Option<Claims> {
    let token = bearer_token(req.headers())?;
    verify_jwt(&token, &jwt.secret).ok()
}
