//! Error types for the search layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Query Error Enum ==
/// Failure of a single dispatch to the upstream query service.
///
/// `Aborted` is the expected outcome of a superseded request and is never
/// surfaced to callers; every other variant is a genuine failure.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Request was cancelled because a newer one superseded it
    #[error("Request aborted")]
    Aborted,

    /// Transport-level failure talking to the query service
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Query service answered with a non-success status
    #[error("Query service returned status {0}")]
    Status(u16),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Query service is unreachable or refused the request
    #[error("Query service unavailable: {0}")]
    Unavailable(String),
}

impl QueryError {
    /// Returns true for the cancellation marker, false for real failures.
    pub fn is_abort(&self) -> bool {
        matches!(self, QueryError::Aborted)
    }
}

// == API Error Enum ==
/// Error type returned by the diagnostics HTTP surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested history session does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A newer search replaced this one before it produced an outcome
    #[error("Superseded by a newer search: {0}")]
    Superseded(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Superseded(_) => StatusCode::CONFLICT,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
