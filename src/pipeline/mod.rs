//! Pipeline entry points
//!
//! Builds the initial meeting state for an input, runs the orchestrator to
//! a terminal state, stamps the wall-clock duration, and persists the
//! result exactly once on success. Nothing is persisted on failure.

pub mod client;
pub mod orchestrator;
pub mod stages;

pub use client::GenerationClient;
pub use orchestrator::{Orchestrator, PipelineStep};

use crate::config::AppConfig;
use crate::domain::models::MeetingState;
use crate::error::Result;
use crate::ports::llm::LlmServicePort;
use crate::ports::speech::SpeechServicePort;
use crate::ports::storage::StoragePort;
use std::sync::Arc;
use std::time::Instant;

/// Entry-point facade over the orchestrator and persistence
pub struct Pipeline {
    config: AppConfig,
    llm: Arc<dyn LlmServicePort>,
    speech: Arc<dyn SpeechServicePort>,
    storage: Arc<dyn StoragePort>,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        llm: Arc<dyn LlmServicePort>,
        speech: Arc<dyn SpeechServicePort>,
        storage: Arc<dyn StoragePort>,
    ) -> Self {
        Self {
            config,
            llm,
            speech,
            storage,
        }
    }

    // A fresh orchestrator per run: it is stateless between runs and one
    // instance handles one MeetingState end-to-end.
    fn orchestrator(&self, temperature: f32) -> Orchestrator {
        let client = Arc::new(GenerationClient::new(
            self.llm.clone(),
            self.config.max_attempts,
            self.config.retry_base_delay,
        ));
        Orchestrator::new(&self.config, temperature, client, self.speech.clone())
    }

    /// Run the complete analysis pipeline from an audio file.
    pub async fn run_from_audio(
        &self,
        audio_path: &str,
        model: Option<String>,
        temperature: Option<f32>,
    ) -> Result<MeetingState> {
        log::info!("Starting audio flow for: {}", audio_path);
        let meeting = MeetingState::from_audio(
            audio_path.to_string(),
            model.unwrap_or_else(|| self.config.model_name.clone()),
        );
        self.run(meeting, temperature).await
    }

    /// Run the complete analysis pipeline from a text transcript.
    pub async fn run_from_text(
        &self,
        transcript: &str,
        model: Option<String>,
        temperature: Option<f32>,
    ) -> Result<MeetingState> {
        log::info!("Starting text flow");
        let meeting = MeetingState::from_text(
            transcript.to_string(),
            model.unwrap_or_else(|| self.config.model_name.clone()),
        );
        self.run(meeting, temperature).await
    }

    async fn run(&self, meeting: MeetingState, temperature: Option<f32>) -> Result<MeetingState> {
        let started = Instant::now();
        let temperature = temperature.unwrap_or(self.config.temperature);

        let mut meeting = self.orchestrator(temperature).run(meeting).await?;
        meeting.processing_time = Some(started.elapsed().as_secs_f64());

        self.storage.save_meeting(&meeting).await?;
        log::info!(
            "Flow complete for meeting {} in {:.2}s",
            meeting.id,
            meeting.processing_time.unwrap_or(0.0)
        );

        Ok(meeting)
    }
}
