use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport failure talking to a third-party API.
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// A third-party payload that passed classification but has an unexpected shape.
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// A unique-index violation becomes `409` with `message`; any other
    /// database failure stays a database error.
    #[must_use]
    pub fn conflict_on_unique(err: sea_orm::DbErr, message: &str) -> Self {
        if crate::repository::is_unique_violation(&err) {
            Self::Conflict(message.to_string())
        } else {
            Self::Database(err)
        }
    }

    /// Collapse transport, parse, database and internal failures into a `400`
    /// carrying the underlying message. Validation and classified upstream
    /// outcomes pass through unchanged.
    #[must_use]
    pub fn into_bad_request(self) -> Self {
        match self {
            Self::Upstream(msg) | Self::Parse(msg) | Self::Internal(msg) => Self::BadRequest(msg),
            Self::Database(e) => Self::BadRequest(e.to_string()),
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Upstream(msg) => {
                tracing::error!("Upstream API error: {msg}");
                (StatusCode::BAD_GATEWAY, format!("Upstream API error: {msg}"))
            }
            Self::Parse(msg) => {
                tracing::error!("Upstream parse error: {msg}");
                (StatusCode::BAD_GATEWAY, format!("Unexpected upstream response: {msg}"))
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::Config(e) => {
                tracing::error!("Config error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
