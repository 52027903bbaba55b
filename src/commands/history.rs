//! History and session listing commands

use crate::error::Result;
use crate::storage::SqliteStore;
use colored::Colorize;
use prettytable::{format, Table};

/// Print conversion records as a table
///
/// # Arguments
///
/// * `store` - Session store to query
/// * `session` - Limit to one session, or None for the most recent records
pub fn print_conversions(store: &SqliteStore, session: Option<&str>) -> Result<()> {
    let conversions = store.list_conversions(session)?;

    if conversions.is_empty() {
        println!("{}", "No conversions recorded yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Session".bold(),
        "Source".bold(),
        "CSV".bold(),
        "Processed".bold()
    ]);

    for record in conversions {
        table.add_row(prettytable::row![
            record.id,
            short_id(&record.session_id).cyan(),
            tail(&record.source_file, 40),
            tail(&record.csv_file, 40),
            record.processed_at.format("%Y-%m-%d %H:%M")
        ]);
    }

    println!("\nConversion History:");
    table.printstd();
    println!();
    Ok(())
}

/// Print recent sessions as a table, newest activity first
pub fn print_sessions(store: &SqliteStore, limit: usize) -> Result<()> {
    let sessions = store.list_recent_sessions(limit)?;

    if sessions.is_empty() {
        println!("{}", "No sessions found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(prettytable::row![
        "Session".bold(),
        "Created".bold(),
        "Last Active".bold(),
        "Messages".bold()
    ]);

    for session in sessions {
        table.add_row(prettytable::row![
            session.session_id.cyan(),
            session.created_at.format("%Y-%m-%d %H:%M"),
            session.last_active.format("%Y-%m-%d %H:%M"),
            session.message_count
        ]);
    }

    println!("\nRecent Sessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to resume a session.",
        "fiscus chat --session <ID>".cyan()
    );
    println!();
    Ok(())
}

/// Shorten a session identifier for display
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Keep the tail of a long path so the file name stays visible
fn tail(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        let skip = count - (max - 3);
        format!("...{}", s.chars().skip(skip).collect::<String>())
    }
}
