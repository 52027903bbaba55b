//! Error types for Fiscus
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Fiscus operations
///
/// This enum encompasses all possible errors that can occur during
/// turn processing, configuration loading, provider interactions,
/// document conversion, and storage operations.
#[derive(Error, Debug)]
pub enum FiscusError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, authentication, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Web search errors
    #[error("Search error: {0}")]
    Search(String),

    /// Document reading errors (missing file, unsupported format, parse failure)
    #[error("Document error: {0}")]
    Document(String),

    /// No text layer could be recovered from the source document
    #[error("No text could be extracted from the document. It may be image-based (scanned). Try an OCR tool first.")]
    EmptyDocument,

    /// Artifact export errors (CSV write failures)
    #[error("Export error: {0}")]
    Export(String),

    /// Session/conversion storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Fiscus operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
