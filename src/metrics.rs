//! Performance Scoring
//!
//! Running search metrics and a composite 0–100 health score for a
//! monitoring surface. Cache hits count as searches but are excluded from the
//! latency average.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;

/// Default latency at which the response-time component reaches zero.
pub const DEFAULT_RESPONSE_TIME_CEILING_MS: u64 = 2000;

const RESPONSE_WEIGHT: f64 = 0.4;
const CACHE_WEIGHT: f64 = 0.4;
const ACTIVITY_WEIGHT: f64 = 0.2;

/// Scorer handle shared between the coordinator and the HTTP surface.
pub type SharedScorer = Arc<RwLock<PerformanceScorer>>;

// == Metrics Snapshot ==
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Mean latency over live (non-cache) searches, in milliseconds
    pub avg_response_time_ms: f64,
    /// Percentage of searches answered from cache
    pub cache_hit_rate: f64,
    pub search_count: u64,
}

// == Performance Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PerformanceCategory {
    Initializing,
    Improving,
    Fair,
    Good,
    Excellent,
}

impl PerformanceCategory {
    /// Maps a composite score to its category.
    pub fn from_score(score: f64, has_activity: bool) -> Self {
        if score >= 85.0 {
            PerformanceCategory::Excellent
        } else if score >= 70.0 {
            PerformanceCategory::Good
        } else if score >= 50.0 {
            PerformanceCategory::Fair
        } else if has_activity {
            PerformanceCategory::Improving
        } else {
            PerformanceCategory::Initializing
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceCategory::Initializing => "Initializing",
            PerformanceCategory::Improving => "Improving",
            PerformanceCategory::Fair => "Fair",
            PerformanceCategory::Good => "Good",
            PerformanceCategory::Excellent => "Excellent",
        };
        f.write_str(label)
    }
}

// == Performance Report ==
/// Everything a monitoring surface displays in one value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceReport {
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
    pub score: f64,
    pub category: PerformanceCategory,
}

// == Performance Scorer ==
#[derive(Debug, Clone)]
pub struct PerformanceScorer {
    search_count: u64,
    cache_hits: u64,
    response_time_sum_ms: f64,
    avg_response_time_ms: f64,
    response_time_ceiling_ms: f64,
}

impl PerformanceScorer {
    /// Creates a scorer whose response component hits zero at `ceiling_ms`.
    pub fn new(ceiling_ms: u64) -> Self {
        Self {
            search_count: 0,
            cache_hits: 0,
            response_time_sum_ms: 0.0,
            avg_response_time_ms: 0.0,
            response_time_ceiling_ms: ceiling_ms.max(1) as f64,
        }
    }

    /// Records one completed search.
    pub fn record_search(&mut self, response_time: Duration, from_cache: bool) {
        self.search_count += 1;

        if from_cache {
            self.cache_hits += 1;
            return;
        }

        self.response_time_sum_ms += response_time.as_secs_f64() * 1000.0;
        let live = self.search_count - self.cache_hits;
        self.avg_response_time_ms = self.response_time_sum_ms / live as f64;
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        let cache_hit_rate = if self.search_count == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.search_count as f64 * 100.0
        };

        MetricsSnapshot {
            avg_response_time_ms: self.avg_response_time_ms,
            cache_hit_rate,
            search_count: self.search_count,
        }
    }

    /// Composite score in [0, 100]. Zero until the first search is recorded.
    pub fn score(&self) -> f64 {
        if self.search_count == 0 {
            return 0.0;
        }

        let metrics = self.get_metrics();
        let response = (100.0 * (1.0 - metrics.avg_response_time_ms / self.response_time_ceiling_ms))
            .clamp(0.0, 100.0);

        response * RESPONSE_WEIGHT + metrics.cache_hit_rate * CACHE_WEIGHT + 100.0 * ACTIVITY_WEIGHT
    }

    pub fn category(&self) -> PerformanceCategory {
        PerformanceCategory::from_score(self.score(), self.search_count > 0)
    }

    pub fn report(&self) -> PerformanceReport {
        PerformanceReport {
            metrics: self.get_metrics(),
            score: self.score(),
            category: self.category(),
        }
    }

    /// Resets every counter.
    pub fn clear(&mut self) {
        *self = Self::new(self.response_time_ceiling_ms as u64);
    }
}

impl Default for PerformanceScorer {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_TIME_CEILING_MS)
    }
}

/// Wraps a scorer for sharing across tasks.
pub fn shared(scorer: PerformanceScorer) -> SharedScorer {
    Arc::new(RwLock::new(scorer))
}
