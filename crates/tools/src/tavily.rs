//! Web search and page extraction backends.
//!
//! The search and extract tools talk to a [`SearchBackend`]; the production
//! backend is [`TavilyClient`], a thin wrapper over the Tavily REST API.
//! Payloads come back as raw JSON and are forwarded to the agent verbatim.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("search API returned {status_code}: {message}")]
    Api { status_code: u16, message: String },

    #[error("failed to decode search API response: {0}")]
    Decode(String),
}

/// An external query service: free-text search and URL content extraction.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a web search; returns the service's result payload.
    async fn search(&self, query: &str) -> Result<serde_json::Value, SearchError>;

    /// Extract page content from the given URLs.
    async fn extract(&self, urls: &[String]) -> Result<serde_json::Value, SearchError>;
}

/// Client for the Tavily search and extract endpoints.
pub struct TavilyClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_TAVILY_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    async fn post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, SearchError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint, "Sending Tavily request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status, endpoint, body = %message, "Tavily returned error");
            return Err(SearchError::Api {
                status_code: status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SearchBackend for TavilyClient {
    async fn search(&self, query: &str) -> Result<serde_json::Value, SearchError> {
        self.post("search", json!({ "query": query })).await
    }

    async fn extract(&self, urls: &[String]) -> Result<serde_json::Value, SearchError> {
        self.post("extract", json!({ "urls": urls })).await
    }
}
