//! Transcriber stage
//!
//! Turns the audio reference into speaker-tagged utterances and the raw
//! transcript. Audio understanding runs as a tiered cascade: full
//! recognition + alignment + diarization first, with an in-tier recovery to
//! single-speaker labels when only diarization fails, then a degraded
//! recognition-only tier. If both tiers fail, the run fails — no synthetic
//! transcript is fabricated.

use crate::domain::models::{MeetingState, Utterance, DEFAULT_SPEAKER};
use crate::domain::roles::Role;
use crate::error::{AppError, Result};
use crate::ports::speech::{SpeechConfig, SpeechServicePort, TimedSpan};
use crate::utils::wav;
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use super::{send_message, Stage};

pub struct TranscriberStage {
    speech: Arc<dyn SpeechServicePort>,
    speech_config: SpeechConfig,
    sample_rate: u32,
}

impl TranscriberStage {
    pub fn new(speech: Arc<dyn SpeechServicePort>, speech_config: SpeechConfig, sample_rate: u32) -> Self {
        Self {
            speech,
            speech_config,
            sample_rate,
        }
    }

    /// The fallback cascade over the speech tiers.
    async fn acquire_utterances(&self, audio_path: &Path) -> Result<Vec<Utterance>> {
        match self
            .speech
            .recognize_aligned(audio_path, &self.speech_config)
            .await
        {
            Ok(spans) => {
                // Full tier succeeded; diarization failure is recovered
                // within the tier using the spans already computed.
                match self
                    .speech
                    .diarize(audio_path, &spans, &self.speech_config)
                    .await
                {
                    Ok(utterances) => Ok(utterances),
                    Err(failure) => {
                        log::warn!(
                            "Diarization failed, using default speaker labels: {}",
                            failure
                        );
                        Ok(label_with_default(spans))
                    }
                }
            }
            Err(full_failure) => {
                log::warn!(
                    "Aligned recognition failed, falling back to basic transcription: {}",
                    full_failure
                );
                match self
                    .speech
                    .recognize_basic(audio_path, &self.speech_config)
                    .await
                {
                    Ok(spans) => Ok(label_with_default(spans)),
                    Err(basic_failure) => Err(AppError::Acquisition(format!(
                        "all transcription tiers failed: aligned {}; basic {}",
                        full_failure, basic_failure
                    ))),
                }
            }
        }
    }
}

fn label_with_default(spans: Vec<TimedSpan>) -> Vec<Utterance> {
    spans
        .into_iter()
        .map(|span| Utterance {
            start: span.start,
            end: span.end,
            speaker: DEFAULT_SPEAKER.to_string(),
            text: span.text,
        })
        .collect()
}

#[async_trait]
impl Stage for TranscriberStage {
    fn role(&self) -> Role {
        Role::Transcriber
    }

    async fn run(&self, mut meeting: MeetingState) -> Result<MeetingState> {
        log::info!("Transcriber stage starting...");

        let audio_path = meeting.audio_path.clone().ok_or_else(|| {
            AppError::Validation("Audio path not provided in meeting state".to_string())
        })?;

        // Normalization is a one-shot precondition; its failure is fatal.
        let canonical = wav::normalize(Path::new(&audio_path), self.sample_rate)?;

        let utterances = self.acquire_utterances(&canonical).await?;
        if utterances.is_empty() {
            return Err(AppError::Acquisition(
                "transcription produced no speech".to_string(),
            ));
        }

        let transcript = utterances
            .iter()
            .map(|u| u.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        meeting.transcript_raw = transcript;
        meeting.segments = utterances;

        let content = format!(
            "Transcription complete: {} segments, {} characters",
            meeting.segments.len(),
            meeting.transcript_raw.len()
        );
        let payload = json!({
            "segment_count": meeting.segments.len(),
            "transcript_length": meeting.transcript_raw.len(),
            "speakers": meeting.speakers(),
        });
        send_message(
            &mut meeting,
            Role::Transcriber,
            Role::Summarizer,
            content,
            Some(payload),
        )?;

        log::info!("Transcription complete: {} segments", meeting.segments.len());

        Ok(meeting)
    }
}
