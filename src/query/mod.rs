//! Query Service Module
//!
//! The upstream query service is an external collaborator. This module defines
//! the request/response shapes exchanged with it and the trait the search
//! layer dispatches through.

mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

pub use http::HttpQueryService;
pub use mock::MockQueryService;

// == Query Request ==
/// A single search request: the raw user query and the data source to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub source: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
        }
    }
}

// == Query Response ==
/// Result payload returned by the query service.
///
/// The search layer treats `results` as opaque; only `metadata` is inspected
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Result documents, passed through untouched
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    /// Service-reported timing and totals
    #[serde(default)]
    pub metadata: ResponseMetadata,
}

/// Metadata attached to every [`QueryResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Time the service spent answering, in milliseconds
    #[serde(default)]
    pub response_time_ms: u64,
    /// Total number of matches (may exceed `results.len()`)
    #[serde(default)]
    pub total_results: usize,
}

impl QueryResponse {
    /// Builds a response from a list of results, deriving `total_results`.
    pub fn from_results(results: Vec<serde_json::Value>) -> Self {
        let total_results = results.len();
        Self {
            results,
            metadata: ResponseMetadata {
                response_time_ms: 0,
                total_results,
            },
        }
    }
}

// == Query Service Trait ==
/// Upstream search backend.
///
/// Implementations do not need to observe cancellation themselves: the
/// coordinator drops the in-flight future when a request is superseded.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Runs `request` against the backend.
    async fn search(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError>;
}
