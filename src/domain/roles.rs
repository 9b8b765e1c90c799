/// Agent roles for inter-stage messaging
///
/// A closed enumeration: every participant identity in the pipeline is one
/// of these variants. Unknown labels arriving at the boundary are rejected
/// by `Role::parse`, never turned into a runtime lookup failure.
use serde::{Deserialize, Serialize};

/// A fixed identity a stage acts under when sending or receiving messages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Steward,
    Transcriber,
    Summarizer,
    DecisionExtractor,
    ActionItemAgent,
    System,
}

impl Role {
    /// Wire label for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Steward => "STEWARD",
            Role::Transcriber => "TRANSCRIBER",
            Role::Summarizer => "SUMMARIZER",
            Role::DecisionExtractor => "DECISION_EXTRACTOR",
            Role::ActionItemAgent => "ACTION_ITEM_AGENT",
            Role::System => "SYSTEM",
        }
    }

    /// Typed parse step for labels crossing the boundary. Unknown labels
    /// yield `None`.
    pub fn parse(label: &str) -> Option<Role> {
        match label {
            "STEWARD" => Some(Role::Steward),
            "TRANSCRIBER" => Some(Role::Transcriber),
            "SUMMARIZER" => Some(Role::Summarizer),
            "DECISION_EXTRACTOR" => Some(Role::DecisionExtractor),
            "ACTION_ITEM_AGENT" => Some(Role::ActionItemAgent),
            "SYSTEM" => Some(Role::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
