//! Pipeline stages
//!
//! Each stage is one transformation of the meeting state: it validates its
//! precondition, produces exactly one artifact, and appends exactly one
//! message to the communication log before handing the state back to the
//! orchestrator.

pub mod action_items;
pub mod decisions;
pub mod summarizer;
pub mod transcriber;

pub use action_items::ActionItemStage;
pub use decisions::DecisionStage;
pub use summarizer::SummarizerStage;
pub use transcriber::TranscriberStage;

use crate::domain::models::{AgentMessage, MeetingState};
use crate::domain::roles::Role;
use crate::domain::routing;
use crate::error::{AppError, Result};
use async_trait::async_trait;

/// One pipeline stage
///
/// Takes ownership of the state and returns it transformed, or an error
/// that fails the run. Stages never remove or reorder artifacts produced
/// by earlier stages.
#[async_trait]
pub trait Stage: Send + Sync {
    /// The identity this stage sends messages under.
    fn role(&self) -> Role;

    async fn run(&self, meeting: MeetingState) -> Result<MeetingState>;
}

/// Append the stage's outbound message, enforcing the route policy.
pub(crate) fn send_message(
    meeting: &mut MeetingState,
    from: Role,
    to: Role,
    content: String,
    payload: Option<serde_json::Value>,
) -> Result<()> {
    if !routing::is_allowed(from, to) {
        return Err(AppError::Validation(format!(
            "route {} -> {} is not allowed",
            from, to
        )));
    }
    meeting.append_message(AgentMessage::new(from, to, content, payload));
    Ok(())
}
