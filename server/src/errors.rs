//! Error taxonomy for the monitoring service.
//!
//! Four caller-visible failure classes plus an isolated channel failure:
//! - `Invalid` - malformed caller input, never retried automatically (400)
//! - `NotFound` - unknown monitor or slug (404)
//! - `Unauthorized` - missing/invalid credential (401)
//! - `Storage` - persistence layer failure, surfaced cleanly (500)
//! - `Channel` - one alert channel failed; logged, never fails the operation

use axum::http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Malformed caller input
    Invalid(String),

    /// Unknown monitor, slug, or owner
    NotFound(String),

    /// Missing or invalid credential
    Unauthorized,

    /// Persistence layer failure
    Storage(String),

    /// A single alert channel could not be delivered
    Channel { channel: String, reason: String },
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::Invalid(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    /// HTTP status this error maps to at the web boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Channel failures are collected, never propagated whole; if one
            // ever reaches the boundary it is a server-side fault
            ServiceError::Channel { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Invalid(msg) => write!(f, "{}", msg),
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::Storage(msg) => write!(f, "Storage failure: {}", msg),
            ServiceError::Channel { channel, reason } => {
                write!(f, "Alert channel '{}' failed: {}", channel, reason)
            }
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Storage(err.to_string())
    }
}
