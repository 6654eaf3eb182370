use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::auth::session::{self, SESSION_COOKIE, SessionClaims};
use crate::common::AppState;
use crate::entity::users::Role;
use crate::error::{AppError, AppResult};

/// The authenticated caller, taken from the session cookie or a bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub city: Option<String>,
    pub role: Role,
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            username: claims.username,
            city: claims.city,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_role(&self, role: Role) -> AppResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("{role:?} role required")))
        }
    }

    pub fn require_admin(&self) -> AppResult<()> {
        self.require_role(Role::Admin)
    }

    /// Users may act on their own account; admins on any account.
    pub fn require_self_or_admin(&self, user_id: Uuid) -> AppResult<()> {
        if self.id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You can only manage your own account".to_string(),
            ))
        }
    }
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = cookie_token(parts)
            .or_else(|| bearer_token(parts))
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = session::verify_session_token(token, &state.config)?;
        tracing::trace!(user_id = %claims.sub, "Session verified");

        Ok(Self::from(claims))
    }
}
