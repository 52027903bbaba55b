//! Configuration management for Fiscus
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{FiscusError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Fiscus
///
/// This structure holds all configuration needed for the agent,
/// including provider settings, web search settings, and agent behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, OpenAI-compatible)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL (any chat-completions compatible endpoint)
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key: None,
        }
    }
}

/// Web search configuration (Tavily)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search API base URL (useful for tests and local mocks)
    #[serde(default = "default_search_api_base")]
    pub api_base: String,

    /// API key; falls back to the TAVILY_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum number of results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_search_api_base() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_base: default_search_api_base(),
            api_key: None,
            max_results: default_max_results(),
        }
    }
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Directory where conversion artifacts (CSV files) are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Timeout for provider and search HTTP calls (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Default location of the config file (`<config dir>/fiscus/config.yaml`)
    pub fn default_path() -> String {
        directories::ProjectDirs::from("com", "xbcsmith", "fiscus")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| "config.yaml".to_string())
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FiscusError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| FiscusError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Provider overrides
        if let Ok(provider_type) = std::env::var("FISCUS_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(ollama_host) = std::env::var("FISCUS_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("FISCUS_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(openai_model) = std::env::var("FISCUS_OPENAI_MODEL") {
            self.provider.openai.model = openai_model;
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if self.provider.openai.api_key.is_none() {
                self.provider.openai.api_key = Some(api_key);
            }
        }

        // Search overrides
        if let Ok(api_key) = std::env::var("TAVILY_API_KEY") {
            if self.search.api_key.is_none() {
                self.search.api_key = Some(api_key);
            }
        }

        if let Ok(max_results) = std::env::var("FISCUS_MAX_SEARCH_RESULTS") {
            if let Ok(value) = max_results.parse() {
                self.search.max_results = value;
            } else {
                tracing::warn!("Invalid FISCUS_MAX_SEARCH_RESULTS: {}", max_results);
            }
        }

        // Agent overrides
        if let Ok(output_dir) = std::env::var("FISCUS_OUTPUT_DIR") {
            self.agent.output_dir = output_dir;
        }

        if let Ok(timeout) = std::env::var("FISCUS_REQUEST_TIMEOUT") {
            if let Ok(value) = timeout.parse() {
                self.agent.request_timeout_seconds = value;
            } else {
                tracing::warn!("Invalid FISCUS_REQUEST_TIMEOUT: {}", timeout);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(ref provider) = cli.provider {
            self.provider.provider_type = provider.clone();
        }

        if let Some(ref model) = cli.model {
            match self.provider.provider_type.as_str() {
                "openai" => self.provider.openai.model = model.clone(),
                _ => self.provider.ollama.model = model.clone(),
            }
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Returns
    ///
    /// Returns Ok if configuration is valid
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(FiscusError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["ollama", "openai"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(FiscusError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.search.max_results == 0 {
            return Err(
                FiscusError::Config("search.max_results must be greater than 0".to_string()).into(),
            );
        }

        if self.search.max_results > 10 {
            return Err(FiscusError::Config(
                "search.max_results must be less than or equal to 10".to_string(),
            )
            .into());
        }

        if self.agent.output_dir.is_empty() {
            return Err(
                FiscusError::Config("agent.output_dir cannot be empty".to_string()).into(),
            );
        }

        if self.agent.request_timeout_seconds == 0 {
            return Err(FiscusError::Config(
                "agent.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            search: SearchConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}
