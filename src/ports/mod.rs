/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod llm;
pub mod speech;
pub mod storage;

#[cfg(test)]
pub mod mocks;

pub use llm::{ChatMessage, LlmServicePort};
pub use speech::{SpeechConfig, SpeechFailure, SpeechServicePort, TimedSpan};
pub use storage::{MeetingSummary, StoragePort};
