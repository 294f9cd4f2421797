//! MedSearch - search performance layer for a medical information front end
//!
//! Sits between the user's query input and a remote query service, providing
//! a TTL result cache, debounced cancellable search, instant suggestions,
//! speculative prefetching, windowed rendering and performance scoring.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod history;
pub mod metrics;
pub mod models;
pub mod prefetch;
pub mod query;
pub mod suggest;
pub mod window;

pub use api::{create_router, AppState};
pub use cache::ResultCache;
pub use config::Config;
pub use coordinator::SearchCoordinator;
pub use prefetch::PrefetchQueue;
pub use query::{QueryRequest, QueryResponse, QueryService};
