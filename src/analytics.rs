//! Analytics Side-Channel
//!
//! Search outcomes can be mirrored to an analytics sink. Sinks are
//! fire-and-forget: `record` never blocks the search path and a failing sink
//! never affects search results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

// == Search Outcome ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOutcome {
    CacheHit,
    Fresh,
    Failed,
}

// == Search Event ==
#[derive(Debug, Clone, Serialize)]
pub struct SearchEvent {
    pub query: String,
    pub source: String,
    pub outcome: SearchOutcome,
    pub response_time_ms: u64,
    pub result_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl SearchEvent {
    pub fn new(
        query: impl Into<String>,
        source: impl Into<String>,
        outcome: SearchOutcome,
        response_time_ms: u64,
        result_count: usize,
    ) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
            outcome,
            response_time_ms,
            result_count,
            timestamp: Utc::now(),
        }
    }
}

// == Analytics Sink Trait ==
/// Observer for completed searches.
pub trait AnalyticsSink: Send + Sync {
    /// Accepts one event. Must return promptly and must not panic.
    fn record(&self, event: SearchEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn record(&self, _event: SearchEvent) {}
}

/// Logs each event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: SearchEvent) {
        info!(
            query = %event.query,
            source = %event.source,
            outcome = ?event.outcome,
            response_time_ms = event.response_time_ms,
            result_count = event.result_count,
            "search completed"
        );
    }
}

// == HTTP Sink ==
/// Posts each event as JSON to an analytics endpoint on a background task.
///
/// Requires a running tokio runtime. Delivery failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyticsSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl AnalyticsSink for HttpAnalyticsSink {
    fn record(&self, event: SearchEvent) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        tokio::spawn(async move {
            match client.post(&endpoint).json(&event).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(endpoint = %endpoint, "analytics event delivered");
                }
                Ok(response) => {
                    warn!(endpoint = %endpoint, status = %response.status(), "analytics endpoint rejected event");
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "failed to deliver analytics event");
                }
            }
        });
    }
}
