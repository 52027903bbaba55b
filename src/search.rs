//! Web search integration for Fiscus
//!
//! Provides the SearchProvider trait plus a Tavily-backed implementation and
//! the plain-text rendering used when feeding results back to the model.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{FiscusError, Result};

/// A single hit returned by a web search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Snippet or summary of the page content
    #[serde(default)]
    pub content: String,
}

/// Trait for web search backends
///
/// Implementations run a query and return ranked results. The agent holds the
/// backend behind `Arc<dyn SearchProvider>` so tests can substitute mocks.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a search query and return up to `max_results` hits
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    /// Get the backend name
    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Search client for the Tavily API
#[derive(Debug)]
pub struct TavilyClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl TavilyClient {
    /// Create a new Tavily client
    ///
    /// # Arguments
    ///
    /// * `config` - Search configuration
    /// * `timeout_seconds` - HTTP request timeout
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or the HTTP client cannot be
    /// built
    pub fn new(config: &SearchConfig, timeout_seconds: u64) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            FiscusError::Config(
                "Tavily API key not set. Provide search.api_key or set TAVILY_API_KEY".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("fiscus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FiscusError::Search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key,
        })
    }

    /// Get the configured API base URL
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.api_base);
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        tracing::debug!(query = %query, max_results, "Sending search request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                FiscusError::Search(format!("Failed to reach search API at {}: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(
                FiscusError::Search(format!("Search API error ({}): {}", status, body)).into(),
            );
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| FiscusError::Search(format!("Invalid search response: {}", e)))?;

        tracing::debug!(count = parsed.results.len(), "Search returned results");
        Ok(parsed.results)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

/// Placeholder backend used when no search key is configured
///
/// Lets the agent start for chat-only use; any search turn fails with the
/// original configuration message.
pub struct UnconfiguredSearch {
    reason: String,
}

impl UnconfiguredSearch {
    /// Create a placeholder backend that reports `reason` on every search
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for UnconfiguredSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
        Err(FiscusError::Search(self.reason.clone()).into())
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

/// Render search results as numbered plain text
///
/// Each hit becomes a `[n]` block with the title, URL, and snippet indented
/// beneath it. Returns a fixed sentence when the result list is empty.
///
/// # Examples
///
/// ```
/// use fiscus::search::{format_results, SearchResult};
///
/// let results = vec![SearchResult {
///     title: "Rust Blog".to_string(),
///     url: "https://blog.rust-lang.org".to_string(),
///     content: "News from the Rust team".to_string(),
/// }];
/// let text = format_results(&results);
/// assert!(text.starts_with("[1] Rust Blog"));
/// ```
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}] {}\n    {}\n    {}\n",
                i + 1,
                r.title,
                r.url,
                r.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
