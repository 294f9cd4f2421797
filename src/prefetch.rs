//! Speculative Prefetching
//!
//! Warms the result cache for queries the user is likely to run next. Work is
//! best-effort: duplicates are skipped, failures are logged and dropped, and
//! nothing is ever reported back to a caller.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheKey, SharedCache};
use crate::query::{QueryRequest, QueryService};

/// Default low-priority delay before a prefetch dispatches.
pub const DEFAULT_PREFETCH_DELAY_MS: u64 = 100;

type PendingSet = Arc<Mutex<HashSet<CacheKey>>>;

// == Prefetch Queue ==
#[derive(Clone)]
pub struct PrefetchQueue {
    service: Arc<dyn QueryService>,
    cache: SharedCache,
    pending: PendingSet,
    delay: Duration,
}

impl PrefetchQueue {
    pub fn new(service: Arc<dyn QueryService>, cache: SharedCache, delay: Duration) -> Self {
        Self {
            service,
            cache,
            pending: Arc::new(Mutex::new(HashSet::new())),
            delay,
        }
    }

    // == Prefetch ==
    /// Schedules a background fetch of `(query, source)` into the cache.
    ///
    /// Returns `None` when the pair is already pending or already cached,
    /// otherwise the handle of the spawned task.
    pub async fn prefetch(&self, query: &str, source: &str) -> Option<JoinHandle<()>> {
        if query.trim().is_empty() {
            return None;
        }

        let key = CacheKey::new(query, source);
        if self.is_pending_key(&key) || self.cache.write().await.has(query, source) {
            debug!(key = %key, "prefetch skipped");
            return None;
        }

        let guard = PendingGuard::acquire(self.pending.clone(), key)?;
        let queue = self.clone();
        let request = QueryRequest::new(query, source);

        Some(tokio::spawn(async move {
            queue.fetch(request).await;
            drop(guard);
        }))
    }

    async fn fetch(&self, request: QueryRequest) {
        tokio::time::sleep(self.delay).await;

        if self.cache.write().await.has(&request.query, &request.source) {
            debug!(query = %request.query, "prefetch target cached during delay");
            return;
        }

        match self.service.search(&request).await {
            Ok(payload) => {
                debug!(query = %request.query, source = %request.source, "prefetched result cached");
                self.cache
                    .write()
                    .await
                    .set(&request.query, &request.source, payload);
            }
            Err(e) => {
                warn!(query = %request.query, source = %request.source, error = %e, "prefetch failed");
            }
        }
    }

    // == Pending ==
    pub fn is_pending(&self, query: &str, source: &str) -> bool {
        self.is_pending_key(&CacheKey::new(query, source))
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn is_pending_key(&self, key: &CacheKey) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

// == Pending Guard ==
/// Holds a key in the pending set and releases it on drop, so the marker is
/// cleared on success, failure and task abort alike.
struct PendingGuard {
    pending: PendingSet,
    key: CacheKey,
}

impl PendingGuard {
    /// Inserts `key`; returns `None` if another task already holds it.
    fn acquire(pending: PendingSet, key: CacheKey) -> Option<Self> {
        let inserted = pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        inserted.then_some(Self { pending, key })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
