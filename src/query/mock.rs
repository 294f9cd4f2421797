//! In-memory query service for tests and local demos.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{QueryRequest, QueryResponse, QueryService};
use crate::error::QueryError;

/// A hand-rolled [`QueryService`] with scripted latency and failures.
///
/// Every query succeeds with a single synthetic result unless it was marked
/// as failing. Calls are logged in dispatch order.
#[derive(Debug, Default)]
pub struct MockQueryService {
    default_delay: Duration,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    calls: Mutex<Vec<QueryRequest>>,
    call_count: AtomicUsize,
}

impl MockQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latency applied to every query without a specific delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Latency for one exact query string.
    pub fn with_query_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(query.into(), delay);
        self
    }

    /// Makes one exact query string fail with [`QueryError::Unavailable`].
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Number of dispatches received, including ones later cancelled.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<QueryRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Payload the mock answers `request` with.
    pub fn response_for(request: &QueryRequest) -> QueryResponse {
        QueryResponse::from_results(vec![json!({
            "title": format!("Result for {}", request.query),
            "source": request.source,
        })])
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn search(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let delay = self
            .delays
            .get(&request.query)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&request.query) {
            return Err(QueryError::Unavailable(format!(
                "scripted failure for '{}'",
                request.query
            )));
        }

        let mut response = Self::response_for(request);
        response.metadata.response_time_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Ok(response)
    }
}
