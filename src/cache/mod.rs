//! Cache Module
//!
//! Provides the search result cache: lazy TTL expiry and FIFO eviction.

mod entry;
mod order;
mod stats;
mod store;


use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::{CacheStats, EntryAge};
pub use store::ResultCache;

/// Cache handle shared between the coordinator, the prefetcher and the HTTP surface.
pub type SharedCache = Arc<RwLock<ResultCache>>;

// == Public Constants ==
/// Default maximum number of cached results
pub const DEFAULT_CAPACITY: usize = 100;

/// Default entry time-to-live in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;

// == Key Helpers ==
/// Trims and case-folds a query so equivalent inputs share a cache slot.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

// == Cache Key ==
/// Composite key: normalized query plus source, compared field by field so
/// no pair of inputs can alias another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub source: String,
}

impl CacheKey {
    pub fn new(query: &str, source: &str) -> Self {
        Self {
            query: normalize_query(query),
            source: source.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.query, self.source)
    }
}

/// Wraps a cache for sharing across tasks.
pub fn shared(cache: ResultCache) -> SharedCache {
    Arc::new(RwLock::new(cache))
}
