use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use fiscus::error::Result;
use fiscus::providers::{CompletionResponse, Message, Provider};
use fiscus::search::{SearchProvider, SearchResult};
use fiscus::storage::SqliteStore;

#[allow(dead_code)]
pub fn create_temp_store() -> (SqliteStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("fiscus.db");
    let store = SqliteStore::new_with_path(db_path).expect("failed to create store with path");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn write_document(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write document");
    path
}

/// Generate a valid PDF with one text line per entry, using lopdf (the
/// library pdf-extract parses with).
#[allow(dead_code)]
pub fn make_test_pdf(lines: &[&str]) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    // Content stream: BT /F1 12 Tf, then one Td/Tj pair per line.
    let mut content = String::from("BT /F1 12 Tf 72 720 Td ");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("0 -18 Td ");
        }
        content.push_str(&format!("({}) Tj ", line));
    }
    content.push_str("ET");

    let content_stream = Stream::new(dictionary! {}, content.into_bytes());
    let content_id = doc.add_object(content_stream);

    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });

    if let Ok(page) = doc.get_object_mut(page_id) {
        if let Object::Dictionary(ref mut dict) = page {
            dict.set("Parent", pages_id);
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });

    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to serialize test PDF");
    buf
}

/// Provider replaying scripted responses in order; captures every request.
pub struct ScriptedProvider {
    responses: Vec<Message>,
    calls: Arc<Mutex<usize>>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses,
            calls: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut calls = self.calls.lock().unwrap();
        let index = *calls;
        *calls += 1;

        let message = self
            .responses
            .get(index)
            .cloned()
            .unwrap_or_else(|| Message::assistant("Done"));
        Ok(CompletionResponse::new(message))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Search backend returning the same fixed results for every query.
pub struct FixedSearch {
    pub results: Vec<SearchResult>,
}

#[allow(dead_code)]
impl FixedSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl SearchProvider for FixedSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
        Ok(self.results.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
