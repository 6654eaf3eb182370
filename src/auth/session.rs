//! JWT session token creation and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::entity::users::{self, Role};
use crate::error::{AppError, AppResult};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "Authorization";

/// JWT session claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub role: Role,
}

impl SessionClaims {
    #[must_use]
    pub fn new(user: &users::Model, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(config.jwt_expiry_minutes);

        Self {
            sub: user.id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: config.jwt_issuer.clone(),
            aud: config.jwt_audience.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            city: Some(user.city.clone()).filter(|city| !city.is_empty()),
            role: user.role,
        }
    }
}

pub fn create_session_token(user: &users::Model, config: &Config) -> AppResult<String> {
    let claims = SessionClaims::new(user, config);
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::Internal(format!("create JWT: {e}")))
}

/// Verify signature, expiry, issuer and audience.
pub fn verify_session_token(token: &str, config: &Config) -> AppResult<SessionClaims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_audience(&[&config.jwt_audience]);

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => AppError::Unauthorized("Invalid or expired session".to_string()),
        _ => AppError::Internal(format!("JWT verification: {e}")),
    })?;

    Ok(token_data.claims)
}

/// `Set-Cookie` value for a freshly issued token.
#[must_use]
pub fn session_cookie(token: &str, config: &Config) -> String {
    let max_age = config.jwt_expiry_minutes * 60;
    let secure = if config.session_cookie_secure { "; Secure" } else { "" };

    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{secure}")
}

/// `Set-Cookie` value that expires the session cookie.
#[must_use]
pub fn clear_session_cookie(config: &Config) -> String {
    let secure = if config.session_cookie_secure { "; Secure" } else { "" };

    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{secure}")
}
