//! API Module
//!
//! HTTP handlers and routing for the search diagnostics API.
//!
//! # Endpoints
//! - `GET /search` - Run a search through the coordinator
//! - `GET /suggest` - Instant suggestions
//! - `POST /prefetch` - Warm the cache
//! - `GET|DELETE /metrics` - Performance report
//! - `GET /cache/stats`, `DELETE /cache` - Cache diagnostics
//! - `GET /history` - Recent sessions
//! - `POST /history/:id/rerun` - Repeat a session
//! - `GET /window` - Virtual window bounds
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
