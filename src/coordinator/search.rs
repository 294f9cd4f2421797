//! Generation-tagged search dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Debouncer, DEFAULT_DEBOUNCE_MS};
use crate::analytics::{AnalyticsSink, NoopSink, SearchEvent, SearchOutcome};
use crate::cache::{self, ResultCache, SharedCache, DEFAULT_CAPACITY, DEFAULT_TTL_SECS};
use crate::error::QueryError;
use crate::history::{self, SearchHistory, SearchSession, SharedHistory};
use crate::metrics::{self, PerformanceScorer, SharedScorer};
use crate::query::{QueryRequest, QueryResponse, QueryService};
use crate::suggest::{default_vocabulary, suggest, Suggestion};

/// Receives the single outcome of a search burst: a payload, or `None` for an
/// empty query or a failed dispatch.
pub type ResultCallback = Box<dyn FnOnce(Option<QueryResponse>) + Send + 'static>;

// == Dispatch State ==
/// Mutable coordinator state. Every transition happens under one lock so a
/// newer dispatch cannot interleave between a generation check and the
/// effects it guards.
#[derive(Debug)]
struct DispatchState {
    /// Identifies the most recently issued dispatch
    generation: u64,
    /// Identifies the most recently scheduled burst
    epoch: u64,
    debounce: Debouncer,
    /// Cancellation handle of the live dispatch
    in_flight: Option<CancellationToken>,
}

struct Inner {
    service: Arc<dyn QueryService>,
    cache: SharedCache,
    history: SharedHistory,
    scorer: SharedScorer,
    analytics: Arc<dyn AnalyticsSink>,
    vocabulary: Vec<String>,
    state: Mutex<DispatchState>,
    suggestions: watch::Sender<Vec<Suggestion>>,
    searching: watch::Sender<bool>,
}

// == Search Coordinator ==
/// Front door for one search surface.
///
/// Cloning is cheap and clones share state, so a handle can be moved into
/// request handlers or UI callbacks.
#[derive(Clone)]
pub struct SearchCoordinator {
    inner: Arc<Inner>,
}

impl SearchCoordinator {
    /// Starts building a coordinator around `service`.
    pub fn builder(service: Arc<dyn QueryService>) -> SearchCoordinatorBuilder {
        SearchCoordinatorBuilder::new(service)
    }

    // == Perform Search ==
    /// Publishes instant suggestions, then (re)starts the debounce timer.
    ///
    /// When the timer fires, `on_result` receives exactly one outcome unless a
    /// later call or [`cleanup`](Self::cleanup) supersedes it first, in which
    /// case it is dropped without being called.
    pub async fn perform_search<F>(&self, query: &str, source: &str, on_result: F)
    where
        F: FnOnce(Option<QueryResponse>) + Send + 'static,
    {
        let suggestions = {
            let history = self.inner.history.read().await;
            suggest(query, &self.inner.vocabulary, history.queries())
        };
        self.inner.suggestions.send_replace(suggestions);

        let mut state = self.inner.state.lock().await;
        state.epoch += 1;
        let epoch = state.epoch;

        let inner = Arc::clone(&self.inner);
        let query = query.to_string();
        let source = source.to_string();
        state.debounce.schedule(async move {
            inner.run(epoch, query, source, Box::new(on_result)).await;
        });
    }

    // == Rerun Session ==
    /// Repeats a recorded search against its first source.
    ///
    /// Returns false if the session is no longer in history.
    pub async fn rerun_session<F>(&self, id: Uuid, on_result: F) -> bool
    where
        F: FnOnce(Option<QueryResponse>) + Send + 'static,
    {
        let target = {
            let history = self.inner.history.read().await;
            history
                .find(id)
                .and_then(|s| s.sources.first().map(|source| (s.query.clone(), source.clone())))
        };

        match target {
            Some((query, source)) => {
                self.perform_search(&query, &source, on_result).await;
                true
            }
            None => false,
        }
    }

    // == Cleanup ==
    /// Cancels the pending timer and the live dispatch, clears suggestions
    /// and the searching flag. Late completions are discarded.
    pub async fn cleanup(&self) {
        let mut state = self.inner.state.lock().await;
        state.epoch += 1;
        state.debounce.cancel();
        self.inner.supersede(&mut state);
        self.inner.suggestions.send_replace(Vec::new());
        debug!(generation = state.generation, "search coordinator cleaned up");
    }

    // == Accessors ==
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.inner.suggestions.borrow().clone()
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.inner.suggestions.subscribe()
    }

    pub fn is_searching(&self) -> bool {
        *self.inner.searching.borrow()
    }

    pub fn subscribe_searching(&self) -> watch::Receiver<bool> {
        self.inner.searching.subscribe()
    }

    pub async fn generation(&self) -> u64 {
        self.inner.state.lock().await.generation
    }

    pub fn cache(&self) -> &SharedCache {
        &self.inner.cache
    }

    pub fn history(&self) -> &SharedHistory {
        &self.inner.history
    }

    pub fn scorer(&self) -> &SharedScorer {
        &self.inner.scorer
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.inner.vocabulary
    }
}

impl Inner {
    /// Cancels the live dispatch (if any) and advances the generation so its
    /// completion is treated as stale.
    fn supersede(&self, state: &mut DispatchState) {
        if let Some(token) = state.in_flight.take() {
            debug!(generation = state.generation, "cancelling superseded search");
            token.cancel();
        }
        state.generation += 1;
        self.searching.send_replace(false);
    }

    async fn run(self: Arc<Self>, epoch: u64, query: String, source: String, on_result: ResultCallback) {
        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            debug!(query = %query, "debounced search replaced before it started");
            return;
        }

        if query.trim().is_empty() {
            self.supersede(&mut state);
            on_result(None);
            return;
        }

        let cached = self.cache.write().await.get(&query, &source);
        if let Some(payload) = cached {
            self.supersede(&mut state);
            debug!(query = %query, source = %source, "serving search from cache");

            self.scorer.write().await.record_search(Duration::ZERO, true);
            self.history
                .write()
                .await
                .record(SearchSession::new(&query, &source, payload.clone(), 0));
            self.analytics.record(SearchEvent::new(
                &query,
                &source,
                SearchOutcome::CacheHit,
                0,
                payload.results.len(),
            ));
            on_result(Some(payload));
            return;
        }

        if let Some(previous) = state.in_flight.take() {
            debug!(generation = state.generation, "aborting previous search");
            previous.cancel();
        }
        state.generation += 1;
        let generation = state.generation;
        let token = CancellationToken::new();
        state.in_flight = Some(token.clone());
        self.searching.send_replace(true);
        drop(state);

        debug!(query = %query, source = %source, generation, "dispatching search");
        let request = QueryRequest::new(query.clone(), source.clone());
        let started = Instant::now();
        let outcome = tokio::select! {
            _ = token.cancelled() => Err(QueryError::Aborted),
            result = self.service.search(&request) => result,
        };
        let elapsed = started.elapsed();

        if let Err(e) = &outcome {
            if e.is_abort() {
                debug!(generation, "search aborted");
                return;
            }
        }

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(generation, current = state.generation, "discarding stale search response");
            return;
        }
        state.in_flight = None;
        self.searching.send_replace(false);

        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(payload) => {
                self.cache.write().await.set(&query, &source, payload.clone());
                self.scorer.write().await.record_search(elapsed, false);
                self.history
                    .write()
                    .await
                    .record(SearchSession::new(&query, &source, payload.clone(), elapsed_ms));
                self.analytics.record(SearchEvent::new(
                    &query,
                    &source,
                    SearchOutcome::Fresh,
                    elapsed_ms,
                    payload.results.len(),
                ));
                on_result(Some(payload));
            }
            Err(e) => {
                warn!(query = %query, source = %source, error = %e, "search failed");
                self.analytics
                    .record(SearchEvent::new(&query, &source, SearchOutcome::Failed, elapsed_ms, 0));
                on_result(None);
            }
        }
    }
}

// == Builder ==
/// Assembles a [`SearchCoordinator`]. Any collaborator not supplied gets a
/// fresh, isolated default.
pub struct SearchCoordinatorBuilder {
    service: Arc<dyn QueryService>,
    cache: Option<SharedCache>,
    history: Option<SharedHistory>,
    scorer: Option<SharedScorer>,
    analytics: Arc<dyn AnalyticsSink>,
    vocabulary: Vec<String>,
    debounce: Duration,
}

impl SearchCoordinatorBuilder {
    fn new(service: Arc<dyn QueryService>) -> Self {
        Self {
            service,
            cache: None,
            history: None,
            scorer: None,
            analytics: Arc::new(NoopSink),
            vocabulary: default_vocabulary(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    pub fn cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn history(mut self, history: SharedHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn scorer(mut self, scorer: SharedScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn analytics(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = sink;
        self
    }

    pub fn vocabulary(mut self, terms: Vec<String>) -> Self {
        self.vocabulary = terms;
        self
    }

    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    pub fn build(self) -> SearchCoordinator {
        let cache = self.cache.unwrap_or_else(|| {
            cache::shared(ResultCache::new(
                DEFAULT_CAPACITY,
                Duration::from_secs(DEFAULT_TTL_SECS),
            ))
        });
        let history = self
            .history
            .unwrap_or_else(|| history::shared(SearchHistory::default()));
        let scorer = self
            .scorer
            .unwrap_or_else(|| metrics::shared(PerformanceScorer::default()));

        let (suggestions, _) = watch::channel(Vec::new());
        let (searching, _) = watch::channel(false);

        SearchCoordinator {
            inner: Arc::new(Inner {
                service: self.service,
                cache,
                history,
                scorer,
                analytics: self.analytics,
                vocabulary: self.vocabulary,
                state: Mutex::new(DispatchState {
                    generation: 0,
                    epoch: 0,
                    debounce: Debouncer::new(self.debounce),
                    in_flight: None,
                }),
                suggestions,
                searching,
            }),
        }
    }
}
