//! API Handlers
//!
//! HTTP request handlers for each diagnostics endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::analytics::AnalyticsSink;
use crate::cache::{self, CacheStats, ResultCache};
use crate::config::Config;
use crate::coordinator::SearchCoordinator;
use crate::error::{ApiError, Result};
use crate::history::{self, SearchHistory};
use crate::metrics::{self, PerformanceReport, PerformanceScorer};
use crate::models::{
    ClearResponse, HealthResponse, HistoryResponse, PrefetchRequest, PrefetchResponse,
    SearchParams, SearchResponse, SuggestParams, SuggestResponse, WindowParams, WindowResponse,
};
use crate::prefetch::PrefetchQueue;
use crate::query::{QueryResponse, QueryService};
use crate::suggest::suggest;
use crate::window::{ScrollEvent, VirtualWindowRenderer};

/// Application state shared across all handlers.
///
/// The coordinator owns the shared cache, history and scorer; the prefetcher
/// writes into the same cache.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: SearchCoordinator,
    pub prefetcher: PrefetchQueue,
    pub overscan: usize,
}

impl AppState {
    /// Creates a new AppState from prebuilt components.
    pub fn new(coordinator: SearchCoordinator, prefetcher: PrefetchQueue, overscan: usize) -> Self {
        Self {
            coordinator,
            prefetcher,
            overscan,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds one cache, history and scorer and injects them into both the
    /// coordinator and the prefetcher.
    pub fn from_config(
        config: &Config,
        service: Arc<dyn QueryService>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let cache = cache::shared(ResultCache::new(config.cache_capacity, config.cache_ttl()));
        let history = history::shared(SearchHistory::new(config.history_limit));
        let scorer = metrics::shared(PerformanceScorer::new(config.response_time_ceiling_ms));

        let coordinator = SearchCoordinator::builder(service.clone())
            .cache(cache.clone())
            .history(history)
            .scorer(scorer)
            .analytics(analytics)
            .debounce(config.debounce())
            .build();
        let prefetcher = PrefetchQueue::new(service, cache, config.prefetch_delay());

        Self::new(coordinator, prefetcher, config.overscan)
    }
}

/// Handler for GET /search
///
/// Runs the query through the shared coordinator and waits for its outcome.
/// A request replaced by a newer search before it produced an outcome gets
/// 409 Conflict.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let (tx, rx) = oneshot::channel();

    state
        .coordinator
        .perform_search(&params.q, &params.source, move |result| {
            let _ = tx.send(result);
        })
        .await;

    await_outcome(rx, params.q, params.source).await
}

/// Handler for POST /history/:id/rerun
///
/// Repeats a recorded session; 404 if it has left the history.
pub async fn rerun_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SearchResponse>> {
    let target = {
        let history = state.coordinator.history().read().await;
        history
            .find(id)
            .and_then(|s| s.sources.first().map(|source| (s.query.clone(), source.clone())))
    };
    let Some((query, source)) = target else {
        return Err(ApiError::NotFound(format!("session {}", id)));
    };

    let (tx, rx) = oneshot::channel();
    let found = state
        .coordinator
        .rerun_session(id, move |result| {
            let _ = tx.send(result);
        })
        .await;
    if !found {
        return Err(ApiError::NotFound(format!("session {}", id)));
    }

    await_outcome(rx, query, source).await
}

/// Waits for the coordinator callback. A dropped sender means the search was
/// superseded.
async fn await_outcome(
    rx: oneshot::Receiver<Option<QueryResponse>>,
    query: String,
    source: String,
) -> Result<Json<SearchResponse>> {
    match rx.await {
        Ok(result) => Ok(Json(SearchResponse {
            query,
            source,
            result,
        })),
        Err(_) => Err(ApiError::Superseded(query)),
    }
}

/// Handler for GET /suggest
pub async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse> {
    let suggestions = {
        let history = state.coordinator.history().read().await;
        suggest(&params.q, state.coordinator.vocabulary(), history.queries())
    };

    Json(SuggestResponse {
        query: params.q,
        suggestions,
    })
}

/// Handler for POST /prefetch
///
/// Always answers 202; `scheduled` is false when the query was already
/// cached or already being prefetched.
pub async fn prefetch_handler(
    State(state): State<AppState>,
    Json(req): Json<PrefetchRequest>,
) -> Result<(StatusCode, Json<PrefetchResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let scheduled = state.prefetcher.prefetch(&req.query, &req.source).await.is_some();

    Ok((StatusCode::ACCEPTED, Json(PrefetchResponse { scheduled })))
}

/// Handler for GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Json<PerformanceReport> {
    let scorer = state.coordinator.scorer().read().await;
    Json(scorer.report())
}

/// Handler for DELETE /metrics
pub async fn clear_metrics_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.coordinator.scorer().write().await.clear();
    Json(ClearResponse::new("Metrics"))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    let cache = state.coordinator.cache().read().await;
    Json(cache.stats())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.coordinator.cache().write().await.clear();
    Json(ClearResponse::new("Cache"))
}

/// Handler for GET /history
pub async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    let history = state.coordinator.history().read().await;
    Json(HistoryResponse::new(history.sessions().cloned().collect()))
}

/// Handler for GET /window
///
/// Computes which slice of a list should be materialized for a scroll state.
pub async fn window_handler(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Json<WindowResponse> {
    let mut renderer = VirtualWindowRenderer::new(params.item_extent, params.viewport, state.overscan);
    renderer.set_item_count(params.count);
    let range = renderer.handle(ScrollEvent::Scrolled {
        offset: params.offset,
    });

    Json(WindowResponse {
        start: range.start,
        end: range.end,
        count: range.len(),
        start_offset: renderer.offset_of(range.start),
        total_extent: renderer.total_extent(),
        max_scroll_offset: renderer.max_scroll_offset(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
