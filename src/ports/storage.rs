/// Storage port trait
///
/// Defines the interface for persisting completed meeting runs.
/// Implementation: SQLite adapter.
use crate::domain::models::{InputKind, MeetingState};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row in the meeting listing, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub input_kind: InputKind,
    /// First 100 characters of the transcript
    pub transcript_preview: String,
    pub model_used: String,
}

/// Port trait for storage operations
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Save a meeting. Idempotent upsert keyed by the meeting's id;
    /// decisions and action items are stored by their own ids with a
    /// reference to the owning meeting.
    async fn save_meeting(&self, meeting: &MeetingState) -> Result<String>;

    /// Get a meeting by ID
    async fn get_meeting(&self, id: &str) -> Result<Option<MeetingState>>;

    /// List recent meetings, newest first
    async fn list_meetings(&self, limit: u32) -> Result<Vec<MeetingSummary>>;
}
