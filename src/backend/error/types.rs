//! Error taxonomy for HTTP handlers.
//!
//! Variants map one-to-one onto the response classes the API exposes:
//! validation (400), authentication (401), authorization (403), not-found
//! (404), conflict (409) and unclassified server failure (500). Store errors
//! are wrapped rather than exposed; the client only ever sees a generic
//! message for them.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input in the request body/params.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid token, but the acting user does not own the resource.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed resource has no row.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key (register, follow).
    #[error("{0}")]
    Conflict(String),

    /// Store failure. Details are logged server-side, never returned.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Anything else that should surface as a 500.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable message for the response body. Store errors collapse to
    /// a generic string; the real error is logged in `conversion`.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }

    /// True when the wrapped store error is a unique-constraint violation.
    /// Used by handlers that map duplicates to 409 (register, follow).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}
