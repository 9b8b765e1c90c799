/// Domain layer - core business models
///
/// These models are backend-agnostic and represent core business entities.
pub mod models;
pub mod prompts;
pub mod roles;
pub mod routing;

pub use models::{
    ActionItem, AgentMessage, ExecutiveSummary, InputKind, ItemStatus, KeyDecision, MeetingState,
    Priority, Utterance, DEFAULT_SPEAKER,
};
pub use prompts::PromptTemplates;
pub use roles::Role;
