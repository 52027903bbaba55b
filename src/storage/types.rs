use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a stored conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    /// Unique identifier for the session
    pub session_id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// When the session last processed a turn
    pub last_active: DateTime<Utc>,
    /// Total number of messages checkpointed across all turns
    pub message_count: usize,
}

/// A recorded document conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Database row id
    pub id: i64,
    /// Session that requested the conversion
    pub session_id: String,
    /// Path of the source document
    pub source_file: String,
    /// Path of the CSV that was written
    pub csv_file: String,
    /// When the conversion completed
    pub processed_at: DateTime<Utc>,
}
