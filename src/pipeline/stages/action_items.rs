//! Action item stage
//!
//! Extracts action items from the transcript. A malformed response
//! degrades to an empty item list.

use crate::domain::models::{ActionItem, ItemStatus, MeetingState, Priority};
use crate::domain::roles::Role;
use crate::domain::prompts::{build_action_item_prompt, PromptTemplates};
use crate::error::{AppError, Result};
use crate::pipeline::client::{parse_structured, GenerationClient};
use crate::ports::llm::ChatMessage;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::{send_message, Stage};

#[derive(Debug, Deserialize)]
struct ActionItemsPayload {
    #[serde(default)]
    action_items: Vec<ItemDraft>,
}

#[derive(Debug, Deserialize)]
struct ItemDraft {
    #[serde(default)]
    description: String,
    owner: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
}

pub struct ActionItemStage {
    client: Arc<GenerationClient>,
    temperature: f32,
}

impl ActionItemStage {
    pub fn new(client: Arc<GenerationClient>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }
}

#[async_trait]
impl Stage for ActionItemStage {
    fn role(&self) -> Role {
        Role::ActionItemAgent
    }

    async fn run(&self, mut meeting: MeetingState) -> Result<MeetingState> {
        log::info!("Action item stage starting...");

        if meeting.transcript_raw.trim().is_empty() {
            return Err(AppError::Validation(
                "No transcript available for action item extraction".to_string(),
            ));
        }

        let messages = [
            ChatMessage::system(PromptTemplates::action_items()),
            ChatMessage::user(build_action_item_prompt(
                &meeting.transcript_raw,
                &meeting.segments,
            )),
        ];

        let response = self
            .client
            .generate(&messages, &meeting.model_used, self.temperature)
            .await?;

        let action_items = match parse_structured::<ActionItemsPayload>(&response) {
            Ok(payload) => payload
                .action_items
                .into_iter()
                .map(|draft| {
                    let mut item = ActionItem::new(draft.description);
                    item.owner = draft.owner;
                    item.due_date = draft.due_date;
                    item.priority = draft
                        .priority
                        .as_deref()
                        .map(Priority::parse_or_default)
                        .unwrap_or_default();
                    item.status = ItemStatus::Pending;
                    item
                })
                .collect(),
            Err(AppError::MalformedResponse { .. }) => {
                log::warn!("Failed to parse structured action items, using empty list");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        meeting.action_items = action_items;

        let content = format!(
            "Action item extraction complete: {} items found",
            meeting.action_items.len()
        );
        let payload = json!({ "action_item_count": meeting.action_items.len() });
        send_message(
            &mut meeting,
            Role::ActionItemAgent,
            Role::Steward,
            content,
            Some(payload),
        )?;

        log::info!(
            "Action item extraction complete: {} items",
            meeting.action_items.len()
        );

        Ok(meeting)
    }
}
