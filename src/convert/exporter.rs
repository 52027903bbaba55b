//! CSV export and extraction summary
//!
//! Flattens the filled template into a three-column CSV (Section, Field,
//! Value) with a marker row at each section boundary, and builds the
//! human-readable summary the agent relays back to the user.

use std::path::Path;

use crate::convert::schema::ExtractedField;
use crate::error::{FiscusError, Result};

/// Write the filled template to a CSV file
///
/// Parent directories are created as needed. Rows appear in template order
/// with a `=== Section ===` marker row before each section.
///
/// # Errors
///
/// Returns error if the output directory cannot be created or the file
/// cannot be written
pub fn write_csv(fields: &[ExtractedField], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            FiscusError::Export(format!(
                "Failed to create output directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut out = String::from("Section,Field,Value\n");
    let mut current_section = "";
    for field in fields {
        if field.section != current_section {
            current_section = field.section;
            out.push_str(&format!(
                "{},,\n",
                csv_field(&format!("=== {} ===", field.section))
            ));
        }
        out.push_str(&format!(
            "{},{},{}\n",
            csv_field(field.section),
            csv_field(field.field),
            csv_field(&field.value.to_string())
        ));
    }

    std::fs::write(path, out)
        .map_err(|e| FiscusError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), rows = fields.len(), "Wrote CSV artifact");
    Ok(())
}

/// Build the human-readable extraction summary
///
/// Lists filled fields with their values and blank fields by name so the
/// user knows what to fill in manually. Diagnostic text only, nothing
/// parses it downstream.
pub fn build_summary(source: &Path, csv_path: &Path, fields: &[ExtractedField]) -> String {
    let mut filled = Vec::new();
    let mut blank = Vec::new();
    for field in fields {
        if field.value.is_default() {
            blank.push(format!("  {} > {}", field.section, field.field));
        } else {
            filled.push(format!(
                "  {} > {}: {}",
                field.section, field.field, field.value
            ));
        }
    }

    let source_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());

    format!(
        "Document processed: {}\nCSV saved to: {}\n\nFields extracted ({}):\n{}\n\nFields left blank ({}) - fill manually:\n{}",
        source_name,
        csv_path.display(),
        filled.len(),
        join_or_none(&filled),
        blank.len(),
        join_or_none(&blank),
    )
}

fn join_or_none(lines: &[String]) -> String {
    if lines.is_empty() {
        "  (none)".to_string()
    } else {
        lines.join("\n")
    }
}

/// Quote a CSV field if it contains a delimiter, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
