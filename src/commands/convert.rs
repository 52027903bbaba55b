//! One-shot document conversion command
//!
//! Runs the conversion pipeline directly, without starting the chat loop
//! or calling a provider. The conversion is still recorded so it shows up
//! in `fiscus history`.

use std::path::{Path, PathBuf};

use colored::Colorize;
use uuid::Uuid;

use crate::config::Config;
use crate::convert::convert_document;
use crate::error::{FiscusError, Result};
use crate::storage::SqliteStore;

/// Convert a single document and record the result
///
/// # Arguments
///
/// * `store` - Session store for the conversion record
/// * `config` - Application configuration (output directory)
/// * `path` - Path to the source document
/// * `session` - Session to record under, or None for a fresh identifier
///
/// # Errors
///
/// Returns error if the file does not exist or the pipeline fails, so the
/// process exits nonzero.
pub fn run_convert(
    store: &SqliteStore,
    config: &Config,
    path: &str,
    session: Option<String>,
) -> Result<()> {
    let source = PathBuf::from(path);
    if !source.is_file() {
        return Err(FiscusError::Document(format!("File not found: {}", source.display())).into());
    }

    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());

    let conversion = convert_document(&source, Path::new(&config.agent.output_dir))?;
    store.record_conversion(
        &session_id,
        &source.to_string_lossy(),
        &conversion.csv_path.to_string_lossy(),
    )?;

    println!("{}", conversion.summary);
    println!();
    println!("{}", format!("Recorded under session {}", session_id).cyan());
    Ok(())
}
