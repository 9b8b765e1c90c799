/// Domain models for Meeting Steward
///
/// These models represent core business entities and are backend-agnostic.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roles::Role;

/// Default speaker label used when diarization is unavailable.
pub const DEFAULT_SPEAKER: &str = "SPEAKER_00";

/// Kind of input a meeting run starts from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Audio,
    Text,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Audio => write!(f, "audio"),
            InputKind::Text => write!(f, "text"),
        }
    }
}

impl InputKind {
    pub fn parse(label: &str) -> Option<InputKind> {
        match label {
            "audio" => Some(InputKind::Audio),
            "text" => Some(InputKind::Text),
            _ => None,
        }
    }
}

/// A single speaker-tagged utterance from the transcript.
///
/// Produced only by the transcriber stage; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Speaker label (e.g., SPEAKER_00)
    pub speaker: String,
    /// Transcript text
    pub text: String,
}

/// Executive summary of the meeting
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutiveSummary {
    /// Summary bullet points, in order
    pub bullets: Vec<String>,
}

/// A key decision made during the meeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyDecision {
    /// Unique decision ID
    pub id: String,
    /// What was decided
    pub description: String,
    /// Person responsible, if mentioned
    pub owner: Option<String>,
    /// When in the meeting the decision was made, if mentioned
    pub timestamp: Option<String>,
    /// Reasoning behind the decision, if mentioned
    pub rationale: Option<String>,
}

impl KeyDecision {
    /// Creates a decision with a freshly generated identifier.
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description,
            owner: None,
            timestamp: None,
            rationale: None,
        }
    }
}

/// Priority level of an action item
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parse a label coming from generated text; anything unrecognized
    /// falls back to the default.
    pub fn parse_or_default(label: &str) -> Priority {
        match label {
            "low" => Priority::Low,
            "medium" => Priority::Medium,
            "high" => Priority::High,
            _ => Priority::default(),
        }
    }
}

/// Status of an action item
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// An action item extracted from the meeting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionItem {
    /// Unique action item ID
    pub id: String,
    /// What needs to be done
    pub description: String,
    /// Person assigned, if mentioned
    pub owner: Option<String>,
    /// Due date reference, if mentioned
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: ItemStatus,
}

impl ActionItem {
    /// Creates an action item with a freshly generated identifier.
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description,
            owner: None,
            due_date: None,
            priority: Priority::default(),
            status: ItemStatus::default(),
        }
    }
}

/// A message exchanged between pipeline stages
///
/// Append-only: once appended to a meeting's log it is never modified or
/// removed. Log order is stage execution order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: String,
    pub from: Role,
    pub to: Role,
    /// Human-readable message content
    pub content: String,
    /// Additional structured data
    pub payload: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    pub fn new(from: Role, to: Role, content: String, payload: Option<serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            from,
            to,
            content,
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Central state object for one meeting analysis run
///
/// Exactly one instance exists per run. The orchestrator owns it for the
/// run's duration and hands it to storage once, after the terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingState {
    pub id: String,
    pub created_at: DateTime<Utc>,

    // Input
    pub input_kind: InputKind,
    pub audio_path: Option<String>,

    // Transcript data
    pub transcript_raw: String,
    pub segments: Vec<Utterance>,

    // Artifacts
    pub summary: Option<ExecutiveSummary>,
    pub decisions: Vec<KeyDecision>,
    pub action_items: Vec<ActionItem>,

    // Inter-stage communication log
    pub messages: Vec<AgentMessage>,

    // Metadata
    pub model_used: String,
    pub processing_time: Option<f64>,
}

impl MeetingState {
    fn new(input_kind: InputKind, model_used: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            input_kind,
            audio_path: None,
            transcript_raw: String::new(),
            segments: Vec::new(),
            summary: None,
            decisions: Vec::new(),
            action_items: Vec::new(),
            messages: Vec::new(),
            model_used,
            processing_time: None,
        }
    }

    /// Creates the initial state for an audio run.
    pub fn from_audio(audio_path: String, model_used: String) -> Self {
        let mut state = Self::new(InputKind::Audio, model_used);
        state.audio_path = Some(audio_path);
        state
    }

    /// Creates the initial state for a text run.
    pub fn from_text(transcript: String, model_used: String) -> Self {
        let mut state = Self::new(InputKind::Text, model_used);
        state.transcript_raw = transcript;
        state
    }

    /// Appends a message to the communication log.
    ///
    /// Invariant: existing entries are never altered or reordered; the log
    /// only grows.
    pub fn append_message(&mut self, message: AgentMessage) {
        self.messages.push(message);
    }

    /// Distinct speaker labels seen in the segments, in first-seen order.
    pub fn speakers(&self) -> Vec<String> {
        let mut speakers: Vec<String> = Vec::new();
        for segment in &self.segments {
            if !speakers.contains(&segment.speaker) {
                speakers.push(segment.speaker.clone());
            }
        }
        speakers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_ids_are_unique() {
        let a = KeyDecision::new("ship friday".to_string());
        let b = KeyDecision::new("ship friday".to_string());
        assert_ne!(a.id, b.id);

        let x = ActionItem::new("own qa".to_string());
        let y = ActionItem::new("own qa".to_string());
        assert_ne!(x.id, y.id);
    }

    #[test]
    fn test_action_item_defaults() {
        let item = ActionItem::new("follow up".to_string());
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.status, ItemStatus::Pending);
    }

    #[test]
    fn test_priority_parse_falls_back_to_medium() {
        assert_eq!(Priority::parse_or_default("high"), Priority::High);
        assert_eq!(Priority::parse_or_default("low"), Priority::Low);
        assert_eq!(Priority::parse_or_default("urgent"), Priority::Medium);
        assert_eq!(Priority::parse_or_default(""), Priority::Medium);
    }

    #[test]
    fn test_append_message_grows_monotonically() {
        let mut state = MeetingState::from_text("hello".to_string(), "llama3.2".to_string());
        state.append_message(AgentMessage::new(
            Role::Summarizer,
            Role::DecisionExtractor,
            "summary complete".to_string(),
            None,
        ));
        let first_id = state.messages[0].id.clone();

        state.append_message(AgentMessage::new(
            Role::DecisionExtractor,
            Role::ActionItemAgent,
            "decisions complete".to_string(),
            None,
        ));

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].id, first_id);
        assert_eq!(state.messages[0].content, "summary complete");
    }

    #[test]
    fn test_from_audio_populates_input() {
        let state = MeetingState::from_audio("standup.wav".to_string(), "llama3.2".to_string());
        assert_eq!(state.input_kind, InputKind::Audio);
        assert_eq!(state.audio_path.as_deref(), Some("standup.wav"));
        assert!(state.transcript_raw.is_empty());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_speakers_deduplicates_in_order() {
        let mut state = MeetingState::from_text(String::new(), "llama3.2".to_string());
        for (speaker, text) in [
            ("SPEAKER_01", "hi"),
            ("SPEAKER_00", "hello"),
            ("SPEAKER_01", "bye"),
        ] {
            state.segments.push(Utterance {
                start: 0.0,
                end: 1.0,
                speaker: speaker.to_string(),
                text: text.to_string(),
            });
        }
        assert_eq!(state.speakers(), vec!["SPEAKER_01", "SPEAKER_00"]);
    }
}
