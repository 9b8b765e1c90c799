//! WhisperX speech service adapter
//!
//! Implements the SpeechServicePort against a self-hosted WhisperX sidecar
//! server sharing this machine's filesystem. The server exposes
//! `/transcribe` (recognition, with or without alignment) and `/diarize`
//! (speaker assignment over previously recognized spans).
//!
//! Connection failures and 501/503 responses map to
//! `SpeechFailure::Unavailable` so the fallback cascade can distinguish a
//! missing capability from a failed run.

use crate::domain::models::Utterance;
use crate::ports::speech::{SpeechConfig, SpeechFailure, SpeechServicePort, TimedSpan};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// WhisperX sidecar service implementation
pub struct WhisperXService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct TranscribeRequest<'a> {
    audio_path: &'a str,
    align: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    segments: Vec<SegmentPayload>,
}

#[derive(Debug, Deserialize)]
struct SegmentPayload {
    start: f64,
    end: f64,
    text: String,
}

#[derive(Debug, Serialize)]
struct DiarizeRequest<'a> {
    audio_path: &'a str,
    segments: &'a [TimedSpan],
    #[serde(skip_serializing_if = "Option::is_none")]
    num_speakers: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DiarizeResponse {
    #[serde(default)]
    utterances: Vec<UtterancePayload>,
}

#[derive(Debug, Deserialize)]
struct UtterancePayload {
    start: f64,
    end: f64,
    speaker: String,
    text: String,
}

impl WhisperXService {
    /// Create a new WhisperX service for the given base URL
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    fn classify_transport(e: reqwest::Error) -> SpeechFailure {
        if e.is_connect() || e.is_timeout() {
            SpeechFailure::Unavailable(format!("speech server unreachable: {}", e))
        } else {
            SpeechFailure::Failed(format!("speech request failed: {}", e))
        }
    }

    fn classify_status(status: StatusCode, body: String) -> SpeechFailure {
        match status {
            StatusCode::NOT_IMPLEMENTED | StatusCode::SERVICE_UNAVAILABLE => {
                SpeechFailure::Unavailable(format!("speech server ({}): {}", status, body))
            }
            _ => SpeechFailure::Failed(format!("speech server ({}): {}", status, body)),
        }
    }

    async fn transcribe(
        &self,
        audio_path: &Path,
        align: bool,
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure> {
        let request = TranscribeRequest {
            audio_path: &audio_path.to_string_lossy(),
            align,
            language: config.language.as_deref(),
        };

        log::info!(
            "Transcribing with WhisperX (align={}): {}",
            align,
            audio_path.display()
        );

        let response = self
            .client
            .post(format!("{}/transcribe", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let parsed: TranscribeResponse = response
            .json()
            .await
            .map_err(|e| SpeechFailure::Failed(format!("bad transcribe response: {}", e)))?;

        Ok(parsed
            .segments
            .into_iter()
            .map(|s| TimedSpan {
                start: s.start,
                end: s.end,
                text: s.text.trim().to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl SpeechServicePort for WhisperXService {
    async fn recognize_aligned(
        &self,
        audio_path: &Path,
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure> {
        self.transcribe(audio_path, true, config).await
    }

    async fn diarize(
        &self,
        audio_path: &Path,
        spans: &[TimedSpan],
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<Utterance>, SpeechFailure> {
        let request = DiarizeRequest {
            audio_path: &audio_path.to_string_lossy(),
            segments: spans,
            num_speakers: config.num_speakers,
        };

        log::info!(
            "Diarizing {} spans with WhisperX: {}",
            spans.len(),
            audio_path.display()
        );

        let response = self
            .client
            .post(format!("{}/diarize", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(Self::classify_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let parsed: DiarizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechFailure::Failed(format!("bad diarize response: {}", e)))?;

        Ok(parsed
            .utterances
            .into_iter()
            .map(|u| Utterance {
                start: u.start,
                end: u.end,
                speaker: u.speaker,
                text: u.text.trim().to_string(),
            })
            .collect())
    }

    async fn recognize_basic(
        &self,
        audio_path: &Path,
        config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure> {
        self.transcribe(audio_path, false, config).await
    }

    fn provider_name(&self) -> &str {
        "whisperx"
    }
}
