//! HTTP-backed query service.

use async_trait::async_trait;
use tracing::debug;

use super::{QueryRequest, QueryResponse, QueryService};
use crate::error::QueryError;

/// Dispatches searches as JSON `POST` requests to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpQueryService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpQueryService {
    /// Creates a service posting to `endpoint` with a default client.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Creates a service reusing an existing client (connection pool, proxy settings).
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn search(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        debug!(query = %request.query, source = %request.source, "dispatching query");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    QueryError::Unavailable(e.to_string())
                } else {
                    QueryError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status(status.as_u16()));
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_kept() {
        let service = HttpQueryService::new("http://localhost:8080/api/query");
        assert_eq!(service.endpoint(), "http://localhost:8080/api/query");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_failure_not_an_abort() {
        // Port 9 (discard) is not expected to be listening.
        let service = HttpQueryService::new("http://127.0.0.1:9/query");
        let result = service
            .search(&QueryRequest::new("diabetes", "pubmed"))
            .await;

        let err = result.unwrap_err();
        assert!(!err.is_abort());
    }
}
