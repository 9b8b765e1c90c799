/// Speech understanding port trait
///
/// Defines the tiered interface the transcriber's fallback cascade runs
/// against. The tiers are separate operations so the cascade policy —
/// which failures are recoverable at which tier — lives in pipeline code,
/// not in the adapter.
use crate::domain::models::Utterance;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A recognized span of speech, not yet speaker-labeled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimedSpan {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    pub text: String,
}

/// Configuration for speech requests
#[derive(Debug, Clone, Default)]
pub struct SpeechConfig {
    /// Language code (e.g., "en")
    pub language: Option<String>,
    /// Number of speakers, if known
    pub num_speakers: Option<u32>,
}

/// Tagged failure reason for one tier operation
///
/// `Unavailable` means the capability itself is missing or unreachable
/// (engine not installed, diarization unconfigured); `Failed` means the
/// engine ran and errored.
#[derive(Debug, Clone)]
pub enum SpeechFailure {
    Unavailable(String),
    Failed(String),
}

impl std::fmt::Display for SpeechFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechFailure::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            SpeechFailure::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Port trait for speech understanding services
#[async_trait]
pub trait SpeechServicePort: Send + Sync {
    /// Full tier: recognition with word-level alignment. Returns unlabeled
    /// timed spans.
    async fn recognize_aligned(
        &self,
        audio_path: &Path,
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure>;

    /// Assign speaker labels to previously recognized spans.
    async fn diarize(
        &self,
        audio_path: &Path,
        spans: &[TimedSpan],
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<Utterance>, SpeechFailure>;

    /// Degraded tier: plain recognition without alignment refinement.
    async fn recognize_basic(
        &self,
        audio_path: &Path,
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
