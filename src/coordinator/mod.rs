//! Search Coordinator Module
//!
//! Debounces user input, serves repeat queries from the result cache and
//! keeps exactly one live dispatch per coordinator, discarding responses that
//! belong to superseded generations.

mod debounce;
mod search;

pub use debounce::Debouncer;
pub use search::{ResultCallback, SearchCoordinator, SearchCoordinatorBuilder};

/// Default quiet period before a burst of input triggers a search.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
