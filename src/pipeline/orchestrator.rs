//! Pipeline state machine
//!
//! Drives one meeting run through a fixed stage order determined by the
//! input kind. The orchestrator owns the MeetingState for the run's
//! duration, threads it through the stages by value, and never skips or
//! retries a stage — retries live inside the generation client.

use crate::config::AppConfig;
use crate::domain::models::{InputKind, MeetingState};
use crate::error::{AppError, Result};
use crate::pipeline::client::GenerationClient;
use crate::pipeline::stages::{
    ActionItemStage, DecisionStage, Stage, SummarizerStage, TranscriberStage,
};
use crate::ports::speech::{SpeechConfig, SpeechServicePort};
use std::sync::Arc;

/// Steps of the pipeline state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Start,
    Transcribing,
    Summarizing,
    ExtractingDecisions,
    ExtractingActionItems,
    Done,
    Failed,
}

impl PipelineStep {
    /// Successor step on stage success. Audio input enters through
    /// transcription; text input skips straight to summarization.
    pub fn next(self, kind: InputKind) -> PipelineStep {
        match self {
            PipelineStep::Start => match kind {
                InputKind::Audio => PipelineStep::Transcribing,
                InputKind::Text => PipelineStep::Summarizing,
            },
            PipelineStep::Transcribing => PipelineStep::Summarizing,
            PipelineStep::Summarizing => PipelineStep::ExtractingDecisions,
            PipelineStep::ExtractingDecisions => PipelineStep::ExtractingActionItems,
            PipelineStep::ExtractingActionItems => PipelineStep::Done,
            PipelineStep::Done => PipelineStep::Done,
            PipelineStep::Failed => PipelineStep::Failed,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStep::Done | PipelineStep::Failed)
    }
}

/// One-run orchestrator over the four stages
pub struct Orchestrator {
    transcriber: TranscriberStage,
    summarizer: SummarizerStage,
    decisions: DecisionStage,
    action_items: ActionItemStage,
}

impl Orchestrator {
    pub fn new(
        config: &AppConfig,
        temperature: f32,
        client: Arc<GenerationClient>,
        speech: Arc<dyn SpeechServicePort>,
    ) -> Self {
        let speech_config = SpeechConfig {
            language: config.language.clone(),
            num_speakers: None,
        };

        Self {
            transcriber: TranscriberStage::new(speech, speech_config, config.sample_rate),
            summarizer: SummarizerStage::new(client.clone(), temperature),
            decisions: DecisionStage::new(client.clone(), temperature),
            action_items: ActionItemStage::new(client, temperature),
        }
    }

    /// Precondition for entering a step; violation fails the run.
    fn check_precondition(step: PipelineStep, meeting: &MeetingState) -> Result<()> {
        match step {
            PipelineStep::Transcribing if meeting.audio_path.is_none() => Err(
                AppError::Validation("audio input requires an audio path".to_string()),
            ),
            PipelineStep::Summarizing
            | PipelineStep::ExtractingDecisions
            | PipelineStep::ExtractingActionItems
                if meeting.transcript_raw.trim().is_empty() =>
            {
                Err(AppError::Validation(format!(
                    "{:?} requires a non-empty transcript",
                    step
                )))
            }
            _ => Ok(()),
        }
    }

    /// Run the state machine to a terminal state.
    ///
    /// `Ok` is the `Done` terminal; `Err` is `Failed`. No partial state
    /// escapes on failure — the state value is dropped with the error.
    pub async fn run(&self, mut meeting: MeetingState) -> Result<MeetingState> {
        let mut step = PipelineStep::Start;
        log::info!(
            "Starting pipeline for meeting {} ({} input)",
            meeting.id,
            meeting.input_kind
        );

        loop {
            let next = step.next(meeting.input_kind);
            Self::check_precondition(next, &meeting)?;

            meeting = match next {
                PipelineStep::Transcribing => self.transcriber.run(meeting).await?,
                PipelineStep::Summarizing => self.summarizer.run(meeting).await?,
                PipelineStep::ExtractingDecisions => self.decisions.run(meeting).await?,
                PipelineStep::ExtractingActionItems => self.action_items.run(meeting).await?,
                PipelineStep::Done => {
                    log::info!("Pipeline done for meeting {}", meeting.id);
                    return Ok(meeting);
                }
                PipelineStep::Start | PipelineStep::Failed => {
                    return Err(AppError::Other(format!(
                        "invalid transition from {:?}",
                        step
                    )));
                }
            };
            step = next;
        }
    }
}
