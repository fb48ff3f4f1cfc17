use chrono::{Duration, Utc};
use errors::{AuthError, CustomError};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "reviews";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Reader,
    Staff,
}

impl Role {
    pub fn from_staff_flag(is_staff: bool) -> Self {
        if is_staff {
            Role::Staff
        } else {
            Role::Reader
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iss: String,
    pub iat: usize,
    pub nbf: usize,
    pub sid: String,
    pub role: Role,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, CustomError> {
        Uuid::parse_str(&self.sub).map_err(|_| {
            AuthError::InvalidSession(anyhow::anyhow!("Token subject is not a user id")).into()
        })
    }
}

/******************************************/
// Creating JWT token
/******************************************/
/// Returns the encoded token and the fresh session id it carries.
pub fn create_jwt(
    user_id: &str,
    role: Role,
    secret: &str,
    expiry_hours: i64,
) -> Result<(String, String), CustomError> {
    let now = Utc::now();
    let issued_at = now.timestamp() as usize;
    let expiration_time = (now + Duration::hours(expiry_hours)).timestamp() as usize;
    let sid = Uuid::new_v4().to_string();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration_time,
        iss: ISSUER.to_string(),
        iat: issued_at,
        nbf: issued_at,
        sid: sid.clone(),
        role,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|err| AuthError::JwtAuthenticationError(err.to_string()))?;

    Ok((token, sid))
}

/******************************************/
// Verifying JWT token
/******************************************/
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, CustomError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|err| AuthError::JwtAuthenticationError(err.to_string()))?;

    if token_data.claims.iat > Utc::now().timestamp() as usize {
        return Err(AuthError::JwtAuthenticationError("Token issued in the future".into()).into());
    }
    Ok(token_data.claims)
}
