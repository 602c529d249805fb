use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors from the web-search collaborator
#[derive(Debug, Error)]
pub enum SearchProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Web-search collaborator: query in, ordered text snippets out.
///
/// Transport failures and empty result sets are both expected and non-fatal
/// to the orchestrator, which degrades to its fallback path.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<String>, SearchProviderError>;
}

/// Tavily-style search API client.
#[derive(Clone)]
pub struct TavilyClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    content: String,
}

impl TavilyClient {
    pub fn new(endpoint: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            client,
        }
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<String>, SearchProviderError> {
        let url = format!("{}/search", self.endpoint.trim_end_matches('/'));

        tracing::debug!("Web search for '{}' (max {} results)", query, max_results);

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "api_key": self.api_key,
                "query": query,
                "max_results": max_results,
                "search_depth": "basic",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchProviderError::ApiError(format!(
                "Search request failed: {}",
                response.status()
            )));
        }

        let body: TavilyResponse = response.json().await?;

        let snippets: Vec<String> = body
            .results
            .into_iter()
            .map(|r| r.content)
            .filter(|c| !c.trim().is_empty())
            .collect();

        tracing::debug!("Web search returned {} snippets", snippets.len());

        Ok(snippets)
    }
}
