//! Ollama provider implementation for Fiscus
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server to generate completions without streaming.

use crate::config::OllamaConfig;
use crate::error::{FiscusError, Result};
use crate::providers::{CompletionResponse, Message, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// Connects to an Ollama server (local or remote) to generate completions.
///
/// # Examples
///
/// ```no_run
/// use fiscus::config::OllamaConfig;
/// use fiscus::providers::{OllamaProvider, Provider, Message};
///
/// # async fn example() -> fiscus::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
/// };
/// let provider = OllamaProvider::new(config, 120)?;
/// let messages = vec![Message::user("Hello!")];
/// let completion = provider.complete(&messages).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/chat endpoint
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

/// Message structure for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama's /api/chat endpoint
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host and model
    /// * `timeout_seconds` - Timeout applied to every request
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::config::OllamaConfig;
    /// use fiscus::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), 120);
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("fiscus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FiscusError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn convert_messages(messages: &[Message]) -> Vec<OllamaMessage> {
        messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let url = format!("{}/api/chat", self.config.host);

        let request = OllamaRequest {
            model: self.config.model.clone(),
            messages: Self::convert_messages(messages),
            stream: false,
        };

        tracing::debug!("Sending Ollama request: {} messages", request.messages.len());

        let response = self.client.post(&url).json(&request).send().await.map_err(|e| {
            tracing::error!("Ollama request failed: {}", e);
            FiscusError::Provider(format!(
                "Failed to reach Ollama at {}: {}",
                self.config.host, e
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(FiscusError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            FiscusError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!("Ollama response: done={}", ollama_response.done);

        Ok(CompletionResponse::new(Message::assistant(
            ollama_response.message.content,
        )))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
