//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::history::SearchSession;
use crate::query::QueryResponse;
use crate::suggest::Suggestion;

/// Response body for GET /search
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub source: String,
    /// Search payload, or null for an empty query or a failed dispatch
    pub result: Option<QueryResponse>,
}

/// Response body for GET /suggest
#[derive(Debug, Clone, Serialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

/// Response body for POST /prefetch
#[derive(Debug, Clone, Serialize)]
pub struct PrefetchResponse {
    /// False when the query was already cached or already pending
    pub scheduled: bool,
}

/// Response body for GET /history
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    /// Sessions, newest first
    pub sessions: Vec<SearchSession>,
}

impl HistoryResponse {
    pub fn new(sessions: Vec<SearchSession>) -> Self {
        Self {
            count: sessions.len(),
            sessions,
        }
    }
}

/// Response body for the DELETE endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new(what: &str) -> Self {
        Self {
            message: format!("{} cleared", what),
        }
    }
}

/// Response body for GET /window
#[derive(Debug, Clone, Serialize)]
pub struct WindowResponse {
    pub start: usize,
    pub end: usize,
    /// Number of items to materialize
    pub count: usize,
    /// Offset of the first materialized item
    pub start_offset: f64,
    pub total_extent: f64,
    pub max_scroll_offset: f64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
