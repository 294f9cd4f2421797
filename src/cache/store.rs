//! Result Cache Module
//!
//! Bounded search-result cache with lazy TTL expiry and FIFO eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, EntryAge, InsertionOrder};
use crate::query::QueryResponse;

// == Result Cache ==
/// Key → payload store keyed by normalized query and source.
///
/// Expiry is checked lazily: an entry older than the TTL is removed the first
/// time a lookup observes it. There is no background sweep.
#[derive(Debug)]
pub struct ResultCache {
    /// Payload storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// Write order, used to pick eviction victims
    order: InsertionOrder,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Entry time-to-live
    ttl: Duration,
}

impl ResultCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Age after which an entry is treated as absent
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Get ==
    /// Returns the payload cached for `(query, source)`.
    ///
    /// An expired entry is deleted and reported as a miss.
    pub fn get(&mut self, query: &str, source: &str) -> Option<QueryResponse> {
        let key = CacheKey::new(query, source);

        if self.remove_if_expired(&key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get(&key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.payload.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Same expiry semantics as [`get`](Self::get) without returning the
    /// payload or touching the hit/miss counters.
    pub fn has(&mut self, query: &str, source: &str) -> bool {
        let key = CacheKey::new(query, source);
        !self.remove_if_expired(&key) && self.entries.contains_key(&key)
    }

    // == Set ==
    /// Stores a payload for `(query, source)`.
    ///
    /// If the key is new and the cache is full, the earliest inserted entry is
    /// evicted first. Overwriting a key refreshes its timestamp and makes it
    /// the newest insertion.
    pub fn set(&mut self, query: &str, source: &str, payload: QueryResponse) {
        if self.capacity == 0 {
            return;
        }

        let key = CacheKey::new(query, source);
        let is_overwrite = self.entries.contains_key(&key);

        while !is_overwrite && self.entries.len() >= self.capacity {
            match self.order.evict_oldest() {
                Some(evicted) => {
                    debug!(key = %evicted, "evicting cache entry");
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => break,
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(payload));
        self.order.record_insert(&key);
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Stats ==
    /// Returns counters, occupancy and entry ages.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.hit_ratio = stats.hit_rate();
        stats.size = self.entries.len();
        stats.capacity = self.capacity;
        stats.ttl_secs = self.ttl.as_secs();
        stats.entries = self
            .order
            .iter()
            .filter_map(|key| {
                self.entries.get(key).map(|entry| EntryAge {
                    query: key.query.clone(),
                    source: key.source.clone(),
                    age_ms: millis(entry.age()),
                    ttl_remaining_ms: millis(entry.ttl_remaining(self.ttl)),
                })
            })
            .collect();
        stats
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Deletes the entry under `key` if it has outlived the TTL.
    fn remove_if_expired(&mut self, key: &CacheKey) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(self.ttl));

        if expired {
            debug!(key = %key, "dropping expired cache entry");
            self.entries.remove(key);
            self.order.remove(key);
        }
        expired
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
