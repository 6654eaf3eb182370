//! Sentinel detection on raw upstream bodies, run before any parsing.

use crate::upstream::models::TimeZoneResponse;
use crate::error::{AppError, AppResult};

pub const DATA_NOT_FOUND: &str = "Data not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Ok,
    NotFound,
    InvalidRequest(String),
}

impl Classification {
    /// `Ok` passes, everything else becomes the matching client-facing error.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Self::Ok => Ok(()),
            Self::NotFound => Err(AppError::NotFound(DATA_NOT_FOUND.to_string())),
            Self::InvalidRequest(msg) => Err(AppError::BadRequest(msg)),
        }
    }
}

#[must_use]
pub fn classify_geo(raw: &str) -> Classification {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Classification::NotFound;
    }
    Classification::Ok
}

#[must_use]
pub fn classify_time_zone(raw: &str) -> Classification {
    if raw.trim().is_empty() {
        return Classification::NotFound;
    }

    // Only a well-formed FAILED status is a sentinel; anything else is left to the parser
    let Ok(response) = serde_json::from_str::<TimeZoneResponse>(raw) else {
        return Classification::Ok;
    };

    if response.status.as_deref() == Some("FAILED") {
        let message = response
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Invalid time zone request".to_string());
        return Classification::InvalidRequest(message);
    }

    Classification::Ok
}

#[must_use]
pub fn classify_solar(raw: &str) -> Classification {
    if raw.trim().is_empty() {
        return Classification::NotFound;
    }
    if raw.contains("INVALID_DATE") {
        return Classification::InvalidRequest("Invalid date".to_string());
    }
    if raw.contains("INVALID_REQUEST") {
        return Classification::InvalidRequest("Invalid longitude/latitude value/s".to_string());
    }
    if raw.contains("UNKNOWN_ERROR") {
        return Classification::InvalidRequest("Server busy, please try again later".to_string());
    }
    Classification::Ok
}
