//! Fiscus - AI tax and research agent library
//!
//! This library provides the core functionality for the Fiscus agent,
//! including intent routing, document-to-CSV conversion, web search, and
//! session persistence.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `agent`: Turn orchestration, intent routing, and per-turn state
//! - `providers`: Generative provider abstraction (Ollama, OpenAI)
//! - `search`: Web search backend (Tavily)
//! - `convert`: Document reading, field extraction, and CSV export
//! - `storage`: SQLite session, history, and conversion store
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: CLI command handlers (chat loop, one-shot conversion)
//! - `prompts`: System instructions sent to the provider
//!
//! # Example
//!
//! ```no_run
//! use fiscus::{Config, SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let store = SqliteStore::new()?;
//!     // Agent usage would go here
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod search;
pub mod storage;

// Re-export commonly used types
pub use agent::{Agent, Intent, TurnOutcome};
pub use config::Config;
pub use error::{FiscusError, Result};
pub use storage::SqliteStore;
