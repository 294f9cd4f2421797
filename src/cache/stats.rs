//! Cache Statistics Module
//!
//! Diagnostics for the result cache: counters plus a per-entry age listing.
//! Nothing in the search path reads these values.

use serde::Serialize;

// == Entry Age ==
/// Age report for one cached entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryAge {
    /// Normalized query
    pub query: String,
    /// Source discriminator
    pub source: String,
    /// Milliseconds since the entry was written
    pub age_ms: u64,
    /// Milliseconds until the entry expires
    pub ttl_remaining_ms: u64,
}

// == Cache Stats ==
/// Snapshot of cache occupancy and activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups served from the cache
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
    /// hits / (hits + misses) at snapshot time
    pub hit_ratio: f64,
    /// Current number of entries
    pub size: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
    /// Ages of live entries, earliest inserted first
    pub entries: Vec<EntryAge>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
