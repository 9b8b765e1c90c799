//! Summarizer stage
//!
//! Generates the executive summary. A response that cannot be parsed as
//! structured JSON degrades to a single bullet holding the trimmed prose.

use crate::domain::models::{ExecutiveSummary, MeetingState};
use crate::domain::roles::Role;
use crate::domain::prompts::{build_summarizer_prompt, PromptTemplates};
use crate::error::{AppError, Result};
use crate::pipeline::client::{parse_structured, GenerationClient};
use crate::ports::llm::ChatMessage;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{send_message, Stage};

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    #[serde(default)]
    bullets: Vec<String>,
}

pub struct SummarizerStage {
    client: Arc<GenerationClient>,
    temperature: f32,
}

impl SummarizerStage {
    pub fn new(client: Arc<GenerationClient>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }
}

#[async_trait]
impl Stage for SummarizerStage {
    fn role(&self) -> Role {
        Role::Summarizer
    }

    async fn run(&self, mut meeting: MeetingState) -> Result<MeetingState> {
        log::info!("Summarizer stage starting...");

        if meeting.transcript_raw.trim().is_empty() {
            return Err(AppError::Validation(
                "No transcript available for summarization".to_string(),
            ));
        }

        let messages = [
            ChatMessage::system(PromptTemplates::summarizer()),
            ChatMessage::user(build_summarizer_prompt(
                &meeting.transcript_raw,
                &meeting.segments,
            )),
        ];

        let response = self
            .client
            .generate(&messages, &meeting.model_used, self.temperature)
            .await?;

        let summary = match parse_structured::<SummaryPayload>(&response) {
            Ok(payload) => ExecutiveSummary {
                bullets: payload.bullets,
            },
            Err(AppError::MalformedResponse { .. }) => {
                log::warn!("Failed to parse structured summary, using fallback bullet");
                ExecutiveSummary {
                    bullets: vec![response.trim().to_string()],
                }
            }
            Err(e) => return Err(e),
        };

        let content = format!("Summary complete: {} bullet points", summary.bullets.len());
        let payload = json!({ "bullets": summary.bullets.clone() });
        meeting.summary = Some(summary);

        send_message(
            &mut meeting,
            Role::Summarizer,
            Role::DecisionExtractor,
            content,
            Some(payload),
        )?;

        log::info!(
            "Summarization complete: {} bullets",
            meeting.summary.as_ref().map(|s| s.bullets.len()).unwrap_or(0)
        );

        Ok(meeting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::ScriptedLlm;
    use std::time::Duration;

    fn stage(llm: ScriptedLlm) -> SummarizerStage {
        let client = Arc::new(GenerationClient::new(
            Arc::new(llm),
            3,
            Duration::from_millis(1),
        ));
        SummarizerStage::new(client, 0.1)
    }

    fn text_meeting(transcript: &str) -> MeetingState {
        MeetingState::from_text(transcript.to_string(), "llama3.2".to_string())
    }

    #[tokio::test]
    async fn test_structured_summary_is_parsed() {
        let llm =
            ScriptedLlm::with_responses(vec![r#"{"bullets": ["Shipping Friday", "Alice owns QA"]}"#]);
        let meeting = stage(llm).run(text_meeting("some transcript")).await.unwrap();

        let summary = meeting.summary.unwrap();
        assert_eq!(summary.bullets.len(), 2);
        assert_eq!(meeting.messages.len(), 1);
        assert_eq!(meeting.messages[0].from, Role::Summarizer);
        assert_eq!(meeting.messages[0].to, Role::DecisionExtractor);
        assert!(meeting.messages[0].content.contains("2 bullet points"));
    }

    #[tokio::test]
    async fn test_prose_response_degrades_to_single_bullet() {
        let llm = ScriptedLlm::with_responses(vec!["  The team talked about shipping.  "]);
        let meeting = stage(llm).run(text_meeting("some transcript")).await.unwrap();

        let summary = meeting.summary.unwrap();
        assert_eq!(summary.bullets, vec!["The team talked about shipping."]);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_validation_error() {
        let llm = ScriptedLlm::with_responses(vec![r#"{"bullets": []}"#]);
        let err = stage(llm.clone()).run(text_meeting("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // The backend is never called when the precondition fails.
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_exhaustion_propagates() {
        let llm = ScriptedLlm::always_failing("timeout");
        let err = stage(llm).run(text_meeting("transcript")).await.unwrap_err();
        assert!(matches!(err, AppError::Exhausted { .. }));
    }
}
