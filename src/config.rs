//! Configuration Module
//!
//! Handles loading and managing search layer configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS};
use crate::coordinator::DEFAULT_DEBOUNCE_MS;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::metrics::DEFAULT_RESPONSE_TIME_CEILING_MS;
use crate::prefetch::DEFAULT_PREFETCH_DELAY_MS;
use crate::window::DEFAULT_OVERSCAN;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_QUERY_SERVICE_URL: &str = "http://localhost:8080/api/query";

/// Search layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached results
    pub cache_capacity: usize,
    /// Cached result time-to-live in seconds
    pub cache_ttl: u64,
    /// Quiet period before a search is dispatched, in milliseconds
    pub debounce_ms: u64,
    /// Low-priority delay before a prefetch dispatches, in milliseconds
    pub prefetch_delay_ms: u64,
    /// Extra items rendered on each side of the viewport
    pub overscan: usize,
    /// Number of search sessions kept in history
    pub history_limit: usize,
    /// Latency at which the response-time score reaches zero, in milliseconds
    pub response_time_ceiling_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream query service endpoint
    pub query_service_url: String,
    /// Optional analytics endpoint; events are only logged when unset
    pub analytics_url: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached results (default: 100)
    /// - `CACHE_TTL` - Result TTL in seconds (default: 300)
    /// - `DEBOUNCE_MS` - Debounce delay (default: 150)
    /// - `PREFETCH_DELAY_MS` - Prefetch delay (default: 100)
    /// - `OVERSCAN` - Windowed rendering overscan (default: 5)
    /// - `HISTORY_LIMIT` - Sessions kept in history (default: 50)
    /// - `RESPONSE_TIME_CEILING_MS` - Scoring latency ceiling (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `QUERY_SERVICE_URL` - Upstream endpoint (default: http://localhost:8080/api/query)
    /// - `ANALYTICS_URL` - Analytics endpoint (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            debounce_ms: parse_var("DEBOUNCE_MS").unwrap_or(defaults.debounce_ms),
            prefetch_delay_ms: parse_var("PREFETCH_DELAY_MS").unwrap_or(defaults.prefetch_delay_ms),
            overscan: parse_var("OVERSCAN").unwrap_or(defaults.overscan),
            history_limit: parse_var("HISTORY_LIMIT").unwrap_or(defaults.history_limit),
            response_time_ceiling_ms: parse_var("RESPONSE_TIME_CEILING_MS")
                .unwrap_or(defaults.response_time_ceiling_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            query_service_url: env::var("QUERY_SERVICE_URL").unwrap_or(defaults.query_service_url),
            analytics_url: env::var("ANALYTICS_URL").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn prefetch_delay(&self) -> Duration {
        Duration::from_millis(self.prefetch_delay_ms)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl: DEFAULT_TTL_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            prefetch_delay_ms: DEFAULT_PREFETCH_DELAY_MS,
            overscan: DEFAULT_OVERSCAN,
            history_limit: DEFAULT_HISTORY_LIMIT,
            response_time_ceiling_ms: DEFAULT_RESPONSE_TIME_CEILING_MS,
            server_port: DEFAULT_SERVER_PORT,
            query_service_url: DEFAULT_QUERY_SERVICE_URL.to_string(),
            analytics_url: None,
        }
    }
}
