//! Document text readers
//!
//! PDF files go through `pdf-extract`; plain-text formats are read directly.
//! The file extension picks the strategy, case-insensitively.

use std::path::Path;

use crate::error::{FiscusError, Result};

/// Read the text content of a document
///
/// # Arguments
///
/// * `path` - Path to a `.pdf`, `.txt`, or `.md` file
///
/// # Errors
///
/// Returns error if the file cannot be read, the PDF has no parseable
/// structure, or the extension is not a supported document type
pub fn read_document(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => read_pdf(path),
        "txt" | "md" => std::fs::read_to_string(path).map_err(|e| {
            FiscusError::Document(format!("Failed to read {}: {}", path.display(), e)).into()
        }),
        _ => Err(FiscusError::Document(format!(
            "Unsupported document type for {}. Supported types: .pdf, .txt, .md",
            path.display()
        ))
        .into()),
    }
}

fn read_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| FiscusError::Document(format!("Failed to read {}: {}", path.display(), e)))?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        FiscusError::Document(format!(
            "Failed to extract text from {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_txt_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("return.txt");
        fs::write(&path, "Wages: $55,000.00").unwrap();

        let text = read_document(&path).unwrap();
        assert_eq!(text, "Wages: $55,000.00");
    }

    #[test]
    fn test_read_md_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Tax Year: 2024").unwrap();

        let text = read_document(&path).unwrap();
        assert!(text.contains("2024"));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("RETURN.TXT");
        fs::write(&path, "Filing Status: Single").unwrap();

        let text = read_document(&path).unwrap();
        assert!(text.contains("Single"));
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let result = read_document(Path::new("/nonexistent/return.txt"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("return.docx");
        fs::write(&path, "not supported").unwrap();

        let result = read_document(&path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unsupported document type"));
    }

    #[test]
    fn test_missing_extension_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("return");
        fs::write(&path, "no extension").unwrap();

        assert!(read_document(&path).is_err());
    }
}
