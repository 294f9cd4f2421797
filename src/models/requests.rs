//! Request DTOs for the diagnostics API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

/// Source searched when a request does not name one
pub const DEFAULT_SOURCE: &str = "pubmed";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

/// Query string for GET /search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// The user query; may be empty
    #[serde(default)]
    pub q: String,
    /// Data source to search
    #[serde(default = "default_source")]
    pub source: String,
}

/// Query string for GET /suggest
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

/// Query string for GET /window
#[derive(Debug, Clone, Deserialize)]
pub struct WindowParams {
    /// Number of items in the list
    pub count: usize,
    /// Extent of one item
    pub item_extent: f64,
    /// Extent of the visible viewport
    pub viewport: f64,
    /// Current scroll offset
    #[serde(default)]
    pub offset: f64,
}

/// Request body for POST /prefetch
#[derive(Debug, Clone, Deserialize)]
pub struct PrefetchRequest {
    pub query: String,
    #[serde(default = "default_source")]
    pub source: String,
}

impl PrefetchRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        if self.source.trim().is_empty() {
            return Some("Source cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_default_source() {
        let params: SearchParams = serde_json::from_str(r#"{"q": "asthma"}"#).unwrap();
        assert_eq!(params.q, "asthma");
        assert_eq!(params.source, "pubmed");
    }

    #[test]
    fn test_prefetch_request_deserialize() {
        let json = r#"{"query": "asthma", "source": "trials"}"#;
        let req: PrefetchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.query, "asthma");
        assert_eq!(req.source, "trials");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_query() {
        let req = PrefetchRequest {
            query: "  ".to_string(),
            source: "pubmed".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_empty_source() {
        let req = PrefetchRequest {
            query: "asthma".to_string(),
            source: "".to_string(),
        };
        assert!(req.validate().is_some());
    }
}
