//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, clear_metrics_handler, health_handler,
    history_handler, metrics_handler, prefetch_handler, rerun_handler, search_handler,
    suggest_handler, window_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /search` - Debounced, cached search (`q`, `source`)
/// - `GET /suggest` - Instant suggestions (`q`)
/// - `POST /prefetch` - Warm the cache for a query
/// - `GET /metrics` / `DELETE /metrics` - Performance report / reset
/// - `GET /cache/stats` / `DELETE /cache` - Cache diagnostics / clear
/// - `GET /history` - Recent search sessions
/// - `POST /history/:id/rerun` - Repeat a recorded session
/// - `GET /window` - Virtual window for a scroll state
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(search_handler))
        .route("/suggest", get(suggest_handler))
        .route("/prefetch", post(prefetch_handler))
        .route("/metrics", get(metrics_handler).delete(clear_metrics_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/history", get(history_handler))
        .route("/history/:id/rerun", post(rerun_handler))
        .route("/window", get(window_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
