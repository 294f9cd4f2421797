//! Cache Entry Module
//!
//! Defines a single cached search result with its insertion time.

use std::time::Duration;

use tokio::time::Instant;

use crate::query::QueryResponse;

// == Cache Entry ==
/// A cached search payload and the metadata needed to expire it.
///
/// Timestamps come from `tokio::time::Instant` so a paused test clock drives
/// expiry deterministically.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub payload: QueryResponse,
    /// When the entry was (last) written
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(payload: QueryResponse) -> Self {
        Self {
            payload,
            inserted_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks the entry against `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// served; it expires once its age is strictly greater.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }

    // == Time To Live ==
    /// Returns how long the entry stays valid under `ttl`, zero once expired.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = CacheEntry::new(QueryResponse::default());

        assert_eq!(entry.age(), Duration::ZERO);
        assert!(!entry.is_expired(TTL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new(QueryResponse::default());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(!entry.is_expired(TTL));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(entry.is_expired(TTL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(QueryResponse::default());

        tokio::time::advance(TTL).await;
        assert!(!entry.is_expired(TTL), "Entry at exactly TTL is still valid");

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired(TTL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_remaining() {
        let entry = CacheEntry::new(QueryResponse::default());

        tokio::time::advance(Duration::from_secs(100)).await;
        assert_eq!(entry.ttl_remaining(TTL), Duration::from_secs(200));

        tokio::time::advance(Duration::from_secs(400)).await;
        assert_eq!(entry.ttl_remaining(TTL), Duration::ZERO);
    }
}
