/// SQLite storage adapter
///
/// Implements StoragePort for SQLite database operations. The meeting row
/// carries the transcript, segments, summary and message log as JSON
/// columns; decisions and action items live in their own tables keyed by
/// artifact id with a reference to the owning meeting.
use crate::domain::models::{
    ActionItem, AgentMessage, ExecutiveSummary, InputKind, KeyDecision, MeetingState, Utterance,
};
use crate::error::{AppError, Result};
use crate::ports::storage::{MeetingSummary, StoragePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// SQLite storage implementation
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

fn parse_created_at(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| rusqlite::Error::InvalidQuery)
}

fn parse_input_kind(raw: &str) -> rusqlite::Result<InputKind> {
    InputKind::parse(raw).ok_or(rusqlite::Error::InvalidQuery)
}

impl SqliteStorage {
    /// Create a new SQLite storage with the given database path
    pub fn new(db_path: PathBuf) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        // Enable foreign keys
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> Result<()> {
        use rusqlite_migration::{Migrations, M};

        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../../migrations/001_initial.sql"
        ))]);

        let mut conn = self.conn.lock().unwrap();
        migrations
            .to_latest(&mut conn)
            .map_err(|e| AppError::Database(rusqlite::Error::ToSqlConversionFailure(Box::new(e))))?;

        Ok(())
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn save_meeting(&self, meeting: &MeetingState) -> Result<String> {
        let segments_json = serde_json::to_string(&meeting.segments)?;
        let summary_json = meeting
            .summary
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let messages_json = serde_json::to_string(&meeting.messages)?;

        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO meetings
             (id, created_at, input_kind, audio_path, transcript_raw, segments_json,
              summary_json, messages_json, model_used, processing_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                meeting.id,
                meeting.created_at.to_rfc3339(),
                meeting.input_kind.to_string(),
                meeting.audio_path,
                meeting.transcript_raw,
                segments_json,
                summary_json,
                messages_json,
                meeting.model_used,
                meeting.processing_time,
            ],
        )?;

        for decision in &meeting.decisions {
            tx.execute(
                "INSERT OR REPLACE INTO decisions (id, meeting_id, data_json)
                 VALUES (?1, ?2, ?3)",
                params![
                    decision.id,
                    meeting.id,
                    serde_json::to_string(decision)?,
                ],
            )?;
        }

        for item in &meeting.action_items {
            tx.execute(
                "INSERT OR REPLACE INTO action_items (id, meeting_id, data_json)
                 VALUES (?1, ?2, ?3)",
                params![item.id, meeting.id, serde_json::to_string(item)?],
            )?;
        }

        tx.commit()?;
        log::info!("Saved meeting {} to database", meeting.id);

        Ok(meeting.id.clone())
    }

    async fn get_meeting(&self, id: &str) -> Result<Option<MeetingState>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, created_at, input_kind, audio_path, transcript_raw, segments_json,
                    summary_json, messages_json, model_used, processing_time
             FROM meetings WHERE id = ?1",
        )?;

        let mut rows = stmt.query(params![id])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let created_at_raw: String = row.get(1)?;
        let input_kind_raw: String = row.get(2)?;
        let segments_json: String = row.get(5)?;
        let summary_json: Option<String> = row.get(6)?;
        let messages_json: String = row.get(7)?;

        let segments: Vec<Utterance> = serde_json::from_str(&segments_json)?;
        let summary: Option<ExecutiveSummary> = summary_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let messages: Vec<AgentMessage> = serde_json::from_str(&messages_json)?;

        let mut meeting = MeetingState {
            id: row.get(0)?,
            created_at: parse_created_at(&created_at_raw)?,
            input_kind: parse_input_kind(&input_kind_raw)?,
            audio_path: row.get(3)?,
            transcript_raw: row.get(4)?,
            segments,
            summary,
            decisions: Vec::new(),
            action_items: Vec::new(),
            messages,
            model_used: row.get(8)?,
            processing_time: row.get(9)?,
        };

        let mut stmt = conn.prepare("SELECT data_json FROM decisions WHERE meeting_id = ?1")?;
        let decision_rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        for data_json in decision_rows {
            let decision: KeyDecision = serde_json::from_str(&data_json?)?;
            meeting.decisions.push(decision);
        }

        let mut stmt = conn.prepare("SELECT data_json FROM action_items WHERE meeting_id = ?1")?;
        let item_rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;
        for data_json in item_rows {
            let item: ActionItem = serde_json::from_str(&data_json?)?;
            meeting.action_items.push(item);
        }

        Ok(Some(meeting))
    }

    async fn list_meetings(&self, limit: u32) -> Result<Vec<MeetingSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, created_at, input_kind, transcript_raw, model_used
             FROM meetings ORDER BY created_at DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            let created_at_raw: String = row.get(1)?;
            let input_kind_raw: String = row.get(2)?;
            let transcript: String = row.get(3)?;

            let transcript_preview = if transcript.chars().count() > 100 {
                format!("{}...", transcript.chars().take(100).collect::<String>())
            } else {
                transcript
            };

            Ok(MeetingSummary {
                id: row.get(0)?,
                created_at: parse_created_at(&created_at_raw)?,
                input_kind: parse_input_kind(&input_kind_raw)?,
                transcript_preview,
                model_used: row.get(4)?,
            })
        })?;

        let mut summaries = Vec::new();
        for summary_result in rows {
            summaries.push(summary_result?);
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ItemStatus, Priority};
    use crate::domain::roles::Role;

    fn storage() -> SqliteStorage {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.run_migrations().unwrap();
        storage
    }

    fn sample_meeting() -> MeetingState {
        let mut meeting = MeetingState::from_text(
            "Team agreed to ship Friday. Alice owns QA.".to_string(),
            "llama3.2".to_string(),
        );
        meeting.summary = Some(ExecutiveSummary {
            bullets: vec!["Shipping Friday".to_string()],
        });

        let mut decision = KeyDecision::new("Ship on Friday".to_string());
        decision.owner = Some("Alice".to_string());
        meeting.decisions.push(decision);

        let mut item = ActionItem::new("Run the QA pass".to_string());
        item.owner = Some("Alice".to_string());
        meeting.action_items.push(item);

        meeting.append_message(AgentMessage::new(
            Role::Summarizer,
            Role::DecisionExtractor,
            "Summary complete: 1 bullet points".to_string(),
            None,
        ));
        meeting.processing_time = Some(1.5);
        meeting
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let storage = storage();
        let meeting = sample_meeting();

        let id = storage.save_meeting(&meeting).await.unwrap();
        assert_eq!(id, meeting.id);

        let loaded = storage.get_meeting(&id).await.unwrap().unwrap();
        assert_eq!(loaded.transcript_raw, meeting.transcript_raw);
        assert_eq!(loaded.summary, meeting.summary);
        assert_eq!(loaded.decisions.len(), 1);
        assert_eq!(loaded.decisions[0].owner.as_deref(), Some("Alice"));
        assert_eq!(loaded.action_items.len(), 1);
        assert_eq!(loaded.action_items[0].priority, Priority::Medium);
        assert_eq!(loaded.action_items[0].status, ItemStatus::Pending);
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.messages[0].from, Role::Summarizer);
        assert_eq!(loaded.processing_time, Some(1.5));
    }

    #[tokio::test]
    async fn test_save_is_idempotent_upsert() {
        let storage = storage();
        let mut meeting = sample_meeting();

        storage.save_meeting(&meeting).await.unwrap();
        meeting.processing_time = Some(2.0);
        storage.save_meeting(&meeting).await.unwrap();

        let listed = storage.list_meetings(10).await.unwrap();
        assert_eq!(listed.len(), 1);

        let loaded = storage.get_meeting(&meeting.id).await.unwrap().unwrap();
        assert_eq!(loaded.processing_time, Some(2.0));
        assert_eq!(loaded.decisions.len(), 1);
    }

    #[tokio::test]
    async fn test_degraded_meeting_persists() {
        // Empty artifact lists are valid and must round-trip.
        let storage = storage();
        let mut meeting = MeetingState::from_text("short".to_string(), "llama3.2".to_string());
        meeting.summary = Some(ExecutiveSummary::default());

        let id = storage.save_meeting(&meeting).await.unwrap();
        let loaded = storage.get_meeting(&id).await.unwrap().unwrap();

        assert!(loaded.decisions.is_empty());
        assert!(loaded.action_items.is_empty());
        assert_eq!(loaded.summary.unwrap().bullets.len(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_meeting_returns_none() {
        let storage = storage();
        assert!(storage.get_meeting("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_previews() {
        let storage = storage();

        let mut old = MeetingState::from_text("a".repeat(150), "llama3.2".to_string());
        old.created_at = Utc::now() - chrono::Duration::seconds(60);
        storage.save_meeting(&old).await.unwrap();

        let new = MeetingState::from_text("recent".to_string(), "llama3.2".to_string());
        storage.save_meeting(&new).await.unwrap();

        let listed = storage.list_meetings(10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, new.id);
        assert_eq!(listed[1].id, old.id);
        assert_eq!(listed[1].transcript_preview.chars().count(), 103);
        assert!(listed[1].transcript_preview.ends_with("..."));
    }
}
