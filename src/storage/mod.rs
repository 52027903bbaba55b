use crate::error::{FiscusError, Result};
use crate::providers::Message;
use anyhow::Context;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;

pub mod types;
pub use types::{ConversionRecord, StoredSession};

/// Storage backend for sessions, conversions, and conversation history
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Create a new storage instance
    ///
    /// Initializes the database file in the user's data directory.
    pub fn new() -> Result<Self> {
        // Allow override of the DB path via environment variable. This makes
        // it easy to point the binary at a test DB or alternate file without
        // changing the user's application data dir.
        if let Ok(override_path) = std::env::var("FISCUS_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "fiscus")
            .ok_or_else(|| FiscusError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        let db_path = data_dir.join("fiscus.db");
        let store = Self { db_path };

        store.init()?;

        Ok(store)
    }

    /// Create a new storage instance that uses the specified database path.
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    ///
    /// # Examples
    ///
    /// ```
    /// use fiscus::storage::SqliteStore;
    ///
    /// let store = SqliteStore::new_with_path("/tmp/test_fiscus.db").unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the DB file succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| FiscusError::Storage(e.to_string()))?;
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                last_active TEXT NOT NULL,
                message_count INTEGER DEFAULT 0
            )",
            [],
        )
        .context("Failed to create sessions table")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                source_file TEXT NOT NULL,
                csv_file TEXT NOT NULL,
                processed_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create conversions table")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                session_id TEXT PRIMARY KEY,
                messages JSON NOT NULL
            )",
            [],
        )
        .context("Failed to create history table")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;
        Ok(conn)
    }

    /// Register activity for a session
    ///
    /// Creates the session row on first contact and afterwards bumps
    /// `last_active` and adds `delta` to the message count. The whole
    /// operation is a single SQL statement, so a crash can never leave a
    /// half-updated row.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Session identifier
    /// * `delta` - Number of messages appended this turn
    pub fn create_or_touch(&self, session_id: &str, delta: usize) -> Result<()> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO sessions (session_id, created_at, last_active, message_count)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                last_active = excluded.last_active,
                message_count = message_count + excluded.message_count",
            params![session_id, now, now, delta as i64],
        )
        .context("Failed to upsert session")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Load the checkpointed message history for a session
    ///
    /// Returns an empty vector for a session that has no checkpoint yet.
    pub fn load_history(&self, session_id: &str) -> Result<Vec<Message>> {
        let conn = self.open()?;

        let row: Option<String> = conn
            .query_row(
                "SELECT messages FROM history WHERE session_id = ?",
                params![session_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query history")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        match row {
            Some(json) => {
                let messages: Vec<Message> = serde_json::from_str(&json)
                    .context("Failed to deserialize messages")
                    .map_err(|e| FiscusError::Storage(e.to_string()))?;
                Ok(messages)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Append messages to a session's checkpointed history
    pub fn append_history(&self, session_id: &str, new_messages: &[Message]) -> Result<()> {
        let mut conn = self.open()?;

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        let existing: Option<String> = tx
            .query_row(
                "SELECT messages FROM history WHERE session_id = ?",
                params![session_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query history")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        let mut messages: Vec<Message> = match existing {
            Some(json) => serde_json::from_str(&json)
                .context("Failed to deserialize messages")
                .map_err(|e| FiscusError::Storage(e.to_string()))?,
            None => Vec::new(),
        };
        messages.extend_from_slice(new_messages);

        let json = serde_json::to_string(&messages)
            .context("Failed to serialize messages")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        tx.execute(
            "INSERT INTO history (session_id, messages) VALUES (?, ?)
            ON CONFLICT(session_id) DO UPDATE SET messages = excluded.messages",
            params![session_id, json],
        )
        .context("Failed to write history")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Record a completed document conversion
    pub fn record_conversion(
        &self,
        session_id: &str,
        source_file: &str,
        csv_file: &str,
    ) -> Result<()> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO conversions (session_id, source_file, csv_file, processed_at)
            VALUES (?, ?, ?, ?)",
            params![session_id, source_file, csv_file, now],
        )
        .context("Failed to insert conversion")
        .map_err(|e| FiscusError::Storage(e.to_string()))?;

        Ok(())
    }

    /// List the most recently active sessions
    pub fn list_recent_sessions(&self, limit: usize) -> Result<Vec<StoredSession>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(
                "SELECT session_id, created_at, last_active, message_count
                FROM sessions
                ORDER BY last_active DESC
                LIMIT ?",
            )
            .context("Failed to prepare statement")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        let sessions_iter = stmt
            .query_map(params![limit as i64], row_to_session)
            .context("Failed to query sessions")
            .map_err(|e| FiscusError::Storage(e.to_string()))?;

        let mut sessions = Vec::new();
        for s in sessions_iter.flatten() {
            sessions.push(s);
        }

        Ok(sessions)
    }

    /// List recorded conversions, newest first
    ///
    /// With a session id this returns every conversion for that session.
    /// Without one it returns the 20 most recent conversions across all
    /// sessions.
    pub fn list_conversions(&self, session_id: Option<&str>) -> Result<Vec<ConversionRecord>> {
        let conn = self.open()?;
        let mut records = Vec::new();

        match session_id {
            Some(sid) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, session_id, source_file, csv_file, processed_at
                        FROM conversions
                        WHERE session_id = ?
                        ORDER BY processed_at DESC",
                    )
                    .context("Failed to prepare statement")
                    .map_err(|e| FiscusError::Storage(e.to_string()))?;
                let iter = stmt
                    .query_map(params![sid], row_to_conversion)
                    .context("Failed to query conversions")
                    .map_err(|e| FiscusError::Storage(e.to_string()))?;
                for r in iter.flatten() {
                    records.push(r);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, session_id, source_file, csv_file, processed_at
                        FROM conversions
                        ORDER BY processed_at DESC
                        LIMIT 20",
                    )
                    .context("Failed to prepare statement")
                    .map_err(|e| FiscusError::Storage(e.to_string()))?;
                let iter = stmt
                    .query_map([], row_to_conversion)
                    .context("Failed to query conversions")
                    .map_err(|e| FiscusError::Storage(e.to_string()))?;
                for r in iter.flatten() {
                    records.push(r);
                }
            }
        }

        Ok(records)
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<StoredSession> {
    let session_id: String = row.get(0)?;
    let created_at: String = row.get(1)?;
    let last_active: String = row.get(2)?;
    let message_count: i64 = row.get(3)?;

    Ok(StoredSession {
        session_id,
        created_at: parse_timestamp(&created_at),
        last_active: parse_timestamp(&last_active),
        message_count: message_count.max(0) as usize,
    })
}

fn row_to_conversion(row: &Row<'_>) -> rusqlite::Result<ConversionRecord> {
    let id: i64 = row.get(0)?;
    let session_id: String = row.get(1)?;
    let source_file: String = row.get(2)?;
    let csv_file: String = row.get(3)?;
    let processed_at: String = row.get(4)?;

    Ok(ConversionRecord {
        id,
        session_id,
        source_file,
        csv_file,
        processed_at: parse_timestamp(&processed_at),
    })
}
