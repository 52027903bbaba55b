//! Document-to-CSV conversion pipeline for Fiscus
//!
//! Turns a tax document into a filled template and a CSV artifact:
//! read the text, run the extraction rules, write the CSV, and build a
//! summary of what was and wasn't found.

pub mod exporter;
pub mod extractor;
pub mod reader;
pub mod rules;
pub mod schema;

pub use exporter::{build_summary, write_csv};
pub use extractor::extract;
pub use reader::read_document;
pub use schema::{ExtractedField, FieldKind, FieldValue};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Outcome of a completed document conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Path of the CSV artifact that was written
    pub csv_path: PathBuf,
    /// Human-readable summary of filled and blank fields
    pub summary: String,
}

/// Run the full conversion pipeline for one document
///
/// The CSV lands in `output_dir` as `<stem>_tax_return.csv`, where `<stem>`
/// is the source file's base name without its extension.
///
/// # Arguments
///
/// * `path` - Source document path
/// * `output_dir` - Directory for the CSV artifact
///
/// # Errors
///
/// Returns error if the document cannot be read, contains no extractable
/// text, or the CSV cannot be written
pub fn convert_document(path: &Path, output_dir: &Path) -> Result<Conversion> {
    tracing::info!(path = %path.display(), "Converting document");

    let text = reader::read_document(path)?;
    let fields = extractor::extract(&text)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let csv_path = output_dir.join(format!("{}_tax_return.csv", stem));

    exporter::write_csv(&fields, &csv_path)?;
    let summary = exporter::build_summary(path, &csv_path, &fields);

    let filled = fields.iter().filter(|f| !f.value.is_default()).count();
    tracing::info!(
        csv = %csv_path.display(),
        filled,
        blank = fields.len() - filled,
        "Conversion complete"
    );

    Ok(Conversion { csv_path, summary })
}
