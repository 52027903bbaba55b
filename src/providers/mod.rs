//! AI provider implementations for Fiscus
//!
//! This module contains the Provider trait and its implementations, plus the
//! factory that builds the configured provider.

pub mod base;
pub mod ollama;
pub mod openai;

pub use base::{CompletionResponse, Message, Provider};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::config::Config;
use crate::error::{FiscusError, Result};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Application configuration specifying the provider type
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
///
/// # Examples
///
/// ```
/// use fiscus::config::Config;
/// use fiscus::providers::create_provider;
///
/// let config = Config::default();
/// let provider = create_provider(&config).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// ```
pub fn create_provider(config: &Config) -> Result<Box<dyn Provider>> {
    let timeout = config.agent.request_timeout_seconds;
    match config.provider.provider_type.as_str() {
        "ollama" => {
            tracing::debug!("Creating Ollama provider");
            Ok(Box::new(OllamaProvider::new(
                config.provider.ollama.clone(),
                timeout,
            )?))
        }
        "openai" => {
            tracing::debug!("Creating OpenAI-compatible provider");
            Ok(Box::new(OpenAiProvider::new(
                config.provider.openai.clone(),
                timeout,
            )?))
        }
        other => Err(FiscusError::Config(format!(
            "Unknown provider type: {}. Must be one of: ollama, openai",
            other
        ))
        .into()),
    }
}
