//! Insertion Order Module
//!
//! Tracks the order in which keys were written, for FIFO eviction.

use std::collections::VecDeque;

use super::CacheKey;

// == Insertion Order ==
/// Tracks write order for first-in-first-out eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Earliest inserted
/// - Back = Most recently inserted
///
/// Reads never reorder keys; only writes do.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Keys by insertion time
    order: VecDeque<CacheKey>,
}

impl InsertionOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record Insert ==
    /// Marks a key as the newest insertion.
    ///
    /// A key written again moves to the back, matching its refreshed
    /// insertion timestamp.
    pub fn record_insert(&mut self, key: &CacheKey) {
        self.remove(key);
        self.order.push_back(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &CacheKey) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the earliest inserted key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheKey> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.front()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Iter ==
    /// Keys from earliest to most recently inserted.
    pub fn iter(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.iter()
    }
}
