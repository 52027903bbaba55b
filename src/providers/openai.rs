//! OpenAI-compatible provider implementation for Fiscus
//!
//! This module implements the Provider trait against any chat-completions
//! compatible endpoint (OpenAI, or a proxy exposing the same API), using
//! bearer-token authentication.

use crate::config::OpenAiConfig;
use crate::error::{FiscusError, Result};
use crate::providers::{CompletionResponse, Message, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible API provider
///
/// Requires an API key, taken from the configuration (which itself falls back
/// to the `OPENAI_API_KEY` environment variable during config loading).
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

/// Request structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Message structure for the chat completions API
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// A single completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiProvider {
    /// Create a new OpenAI-compatible provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Provider configuration (api_base, model, api_key)
    /// * `timeout_seconds` - Timeout applied to every request
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or if HTTP client
    /// initialization fails
    pub fn new(config: OpenAiConfig, timeout_seconds: u64) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            FiscusError::Config(
                "OpenAI API key not set. Provide provider.openai.api_key or set OPENAI_API_KEY"
                    .to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("fiscus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FiscusError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenAI-compatible provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.clone(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        let url = format!("{}/chat/completions", self.config.api_base);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: Self::convert_messages(messages),
        };

        tracing::debug!(
            "Sending chat completions request: {} messages",
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Chat completions request failed: {}", e);
                FiscusError::Provider(format!("Chat completions request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Provider returned error {}: {}", status, error_text);
            return Err(FiscusError::Provider(format!(
                "Provider returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse chat completions response: {}", e);
            FiscusError::Provider(format!("Failed to parse response: {}", e))
        })?;

        let choice = chat_response.choices.into_iter().next().ok_or_else(|| {
            FiscusError::Provider("Response contained no choices".to_string())
        })?;

        Ok(CompletionResponse::new(Message::assistant(
            choice.message.content,
        )))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
