//! Command-line interface definition for Fiscus
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-off document conversion,
//! and history inspection.

use clap::{Parser, Subcommand};

/// Fiscus - AI tax and research agent
///
/// Chat with an AI assistant that can answer questions, search the web,
/// and convert tax documents to CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "fiscus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the provider from config (ollama, openai)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Override the model for the active provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Command to execute (defaults to interactive chat)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Fiscus
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive chat mode with the agent
    Chat {
        /// Resume an existing session by its identifier
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Convert a document to CSV without entering chat mode
    Convert {
        /// Path to the document (.pdf, .txt, .md)
        path: String,

        /// Session to record the conversion under
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show conversion history
    History {
        /// Limit to a single session
        #[arg(short, long)]
        session: Option<String>,
    },

    /// List recent chat sessions
    Sessions {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            verbose: false,
            provider: None,
            model: None,
            command: None,
        }
    }
}
