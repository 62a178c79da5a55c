/**
 * API Error Types
 *
 * This module defines the error taxonomy returned by every handler and by
 * the mutation coordinator. Each variant maps to one HTTP status code.
 *
 * # Variants
 *
 * - `InvalidInput` - missing or malformed fields; the message names the field
 * - `Forbidden` - access gate denial; deliberately generic so unauthenticated
 *   callers cannot distinguish "board missing" from "no access"
 * - `NotFound` - a referenced entity is absent (authenticated callers only)
 * - `Conflict` - duplicate state, e.g. saving an already-collaborated board
 * - `Database` - the record store is unreachable or failing
 */
use axum::http::StatusCode;
use thiserror::Error;

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    InvalidInput(String),

    /// Access gate denial. Carries no detail on purpose.
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// Record store failure.
    #[error("storage unavailable")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Convenience constructor for `InvalidInput`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Convenience constructor for `Conflict`.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message included in the response body. Database details stay in the
    /// server log only.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) => "storage unavailable".to_string(),
            other => other.to_string(),
        }
    }
}
