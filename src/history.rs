//! Search History
//!
//! Bounded, newest-first record of completed searches. Sessions are immutable
//! once recorded and are dropped from the oldest end when the cap is reached.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::query::QueryResponse;

/// Default number of sessions kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// History handle shared between the coordinator and the HTTP surface.
pub type SharedHistory = Arc<RwLock<SearchHistory>>;

// == Search Session ==
/// One completed search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSession {
    pub id: Uuid,
    pub query: String,
    pub sources: Vec<String>,
    pub results: QueryResponse,
    pub timestamp: DateTime<Utc>,
    /// Wall time from dispatch to completion; zero for cache hits
    pub processing_time_ms: u64,
}

impl SearchSession {
    pub fn new(
        query: impl Into<String>,
        source: impl Into<String>,
        results: QueryResponse,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            sources: vec![source.into()],
            results,
            timestamp: Utc::now(),
            processing_time_ms,
        }
    }
}

// == Search History ==
#[derive(Debug)]
pub struct SearchHistory {
    /// Front = newest
    sessions: VecDeque<SearchSession>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            sessions: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Records a session as the newest entry, dropping the oldest past the cap.
    pub fn record(&mut self, session: SearchSession) {
        if self.limit == 0 {
            return;
        }
        self.sessions.push_front(session);
        self.sessions.truncate(self.limit);
    }

    /// Sessions, newest first.
    pub fn sessions(&self) -> impl Iterator<Item = &SearchSession> {
        self.sessions.iter()
    }

    /// Past query strings, newest first.
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.query.as_str())
    }

    pub fn find(&self, id: Uuid) -> Option<&SearchSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// Wraps a history for sharing across tasks.
pub fn shared(history: SearchHistory) -> SharedHistory {
    Arc::new(RwLock::new(history))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(query: &str) -> SearchSession {
        SearchSession::new(query, "pubmed", QueryResponse::default(), 10)
    }

    #[test]
    fn test_newest_first() {
        let mut history = SearchHistory::new(10);
        history.record(session("first"));
        history.record(session("second"));

        let queries: Vec<&str> = history.queries().collect();
        assert_eq!(queries, vec!["second", "first"]);
    }

    #[test]
    fn test_evicts_oldest_past_limit() {
        let mut history = SearchHistory::new(3);
        for q in ["a", "b", "c", "d"] {
            history.record(session(q));
        }

        assert_eq!(history.len(), 3);
        let queries: Vec<&str> = history.queries().collect();
        assert_eq!(queries, vec!["d", "c", "b"]);
    }

    #[test]
    fn test_default_limit() {
        let mut history = SearchHistory::default();
        for i in 0..60 {
            history.record(session(&format!("q{}", i)));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_find_by_id() {
        let mut history = SearchHistory::new(5);
        let s = session("asthma");
        let id = s.id;
        history.record(s);
        history.record(session("copd"));

        assert_eq!(history.find(id).map(|s| s.query.as_str()), Some("asthma"));
        assert!(history.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_session_carries_source() {
        let s = session("asthma");
        assert_eq!(s.sources, vec!["pubmed".to_string()]);
        assert_eq!(s.processing_time_ms, 10);
    }
}
