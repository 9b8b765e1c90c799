//! Decision extractor stage
//!
//! Extracts key decisions from the transcript. A malformed response
//! degrades to an empty decision list.

use crate::domain::models::{KeyDecision, MeetingState};
use crate::domain::roles::Role;
use crate::domain::prompts::{build_decision_prompt, PromptTemplates};
use crate::error::{AppError, Result};
use crate::pipeline::client::{parse_structured, GenerationClient};
use crate::ports::llm::ChatMessage;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{send_message, Stage};

#[derive(Debug, Deserialize)]
struct DecisionsPayload {
    #[serde(default)]
    decisions: Vec<DecisionDraft>,
}

#[derive(Debug, Deserialize)]
struct DecisionDraft {
    #[serde(default)]
    description: String,
    owner: Option<String>,
    timestamp: Option<String>,
    rationale: Option<String>,
}

pub struct DecisionStage {
    client: Arc<GenerationClient>,
    temperature: f32,
}

impl DecisionStage {
    pub fn new(client: Arc<GenerationClient>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }
}

#[async_trait]
impl Stage for DecisionStage {
    fn role(&self) -> Role {
        Role::DecisionExtractor
    }

    async fn run(&self, mut meeting: MeetingState) -> Result<MeetingState> {
        log::info!("Decision extractor stage starting...");

        if meeting.transcript_raw.trim().is_empty() {
            return Err(AppError::Validation(
                "No transcript available for decision extraction".to_string(),
            ));
        }

        let messages = [
            ChatMessage::system(PromptTemplates::decision_extractor()),
            ChatMessage::user(build_decision_prompt(
                &meeting.transcript_raw,
                &meeting.segments,
            )),
        ];

        let response = self
            .client
            .generate(&messages, &meeting.model_used, self.temperature)
            .await?;

        let decisions = match parse_structured::<DecisionsPayload>(&response) {
            Ok(payload) => payload
                .decisions
                .into_iter()
                .map(|draft| {
                    let mut decision = KeyDecision::new(draft.description);
                    decision.owner = draft.owner;
                    decision.timestamp = draft.timestamp;
                    decision.rationale = draft.rationale;
                    decision
                })
                .collect(),
            Err(AppError::MalformedResponse { .. }) => {
                log::warn!("Failed to parse structured decisions, using empty list");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        meeting.decisions = decisions;

        let content = format!(
            "Decision extraction complete: {} decisions found",
            meeting.decisions.len()
        );
        let payload = json!({ "decision_count": meeting.decisions.len() });
        send_message(
            &mut meeting,
            Role::DecisionExtractor,
            Role::ActionItemAgent,
            content,
            Some(payload),
        )?;

        log::info!(
            "Decision extraction complete: {} decisions",
            meeting.decisions.len()
        );

        Ok(meeting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::ScriptedLlm;
    use std::time::Duration;

    fn stage(llm: ScriptedLlm) -> DecisionStage {
        let client = Arc::new(GenerationClient::new(
            Arc::new(llm),
            3,
            Duration::from_millis(1),
        ));
        DecisionStage::new(client, 0.1)
    }

    fn text_meeting(transcript: &str) -> MeetingState {
        MeetingState::from_text(transcript.to_string(), "llama3.2".to_string())
    }

    #[tokio::test]
    async fn test_decisions_are_extracted_with_fresh_ids() {
        let response = r#"{"decisions": [
            {"description": "Ship on Friday", "owner": "Team", "rationale": "Deadline"},
            {"description": "Alice owns QA", "owner": "Alice"}
        ]}"#;
        let llm = ScriptedLlm::with_responses(vec![response]);
        let meeting = stage(llm).run(text_meeting("transcript")).await.unwrap();

        assert_eq!(meeting.decisions.len(), 2);
        assert_ne!(meeting.decisions[0].id, meeting.decisions[1].id);
        assert_eq!(meeting.decisions[0].owner.as_deref(), Some("Team"));
        assert_eq!(meeting.decisions[1].rationale, None);

        assert_eq!(meeting.messages.len(), 1);
        assert_eq!(meeting.messages[0].to, Role::ActionItemAgent);
        assert_eq!(
            meeting.messages[0].payload.as_ref().unwrap()["decision_count"],
            2
        );
    }

    #[tokio::test]
    async fn test_malformed_response_degrades_to_empty_list() {
        let llm = ScriptedLlm::with_responses(vec!["no json here, sorry"]);
        let meeting = stage(llm).run(text_meeting("transcript")).await.unwrap();

        assert!(meeting.decisions.is_empty());
        // The degraded artifact still ships a message.
        assert_eq!(meeting.messages.len(), 1);
        assert!(meeting.messages[0].content.contains("0 decisions"));
    }

    #[tokio::test]
    async fn test_earlier_artifacts_are_untouched() {
        let llm = ScriptedLlm::with_responses(vec![r#"{"decisions": []}"#]);
        let mut meeting = text_meeting("transcript");
        meeting.summary = Some(crate::domain::models::ExecutiveSummary {
            bullets: vec!["kept".to_string()],
        });

        let result = stage(llm).run(meeting).await.unwrap();
        assert_eq!(result.summary.unwrap().bullets, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_validation_error() {
        let llm = ScriptedLlm::with_responses(vec![r#"{"decisions": []}"#]);
        let err = stage(llm).run(text_meeting("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
