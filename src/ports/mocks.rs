//! Mock implementations for testing

use crate::domain::models::{MeetingState, Utterance};
use crate::error::{AppError, Result};
use crate::ports::llm::{ChatMessage, LlmServicePort};
use crate::ports::speech::{SpeechConfig, SpeechFailure, SpeechServicePort, TimedSpan};
use crate::ports::storage::{MeetingSummary, StoragePort};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// LLM backend that replays a fixed script of responses
///
/// Each `chat` call consumes the next scripted entry; once the script is
/// exhausted the fallback entry repeats. Calls are counted so tests can
/// assert attempt caps.
#[derive(Clone)]
pub struct ScriptedLlm {
    script: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    fallback: std::result::Result<String, String>,
    pub calls: Arc<Mutex<u32>>,
    pub known_models: Vec<String>,
    pub pulled: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    /// A backend that answers every call with the given responses in order.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                responses.into_iter().map(|r| Ok(r.to_string())).collect(),
            )),
            fallback: Err("script exhausted".to_string()),
            calls: Arc::new(Mutex::new(0)),
            known_models: vec!["llama3.2".to_string()],
            pulled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend whose every call fails the same way (e.g., a timeout).
    pub fn always_failing(reason: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Err(reason.to_string()),
            calls: Arc::new(Mutex::new(0)),
            known_models: vec!["llama3.2".to_string()],
            pulled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append explicit failures to the script.
    pub fn then_failures(self, count: usize, reason: &str) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            for _ in 0..count {
                script.push_back(Err(reason.to_string()));
            }
        }
        self
    }

    pub fn with_known_models(mut self, models: Vec<&str>) -> Self {
        self.known_models = models.into_iter().map(String::from).collect();
        self
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmServicePort for ScriptedLlm {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
        _temperature: f32,
    ) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map_err(AppError::Llm)
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.known_models.clone())
    }

    async fn pull_model(&self, model: &str) -> Result<()> {
        self.pulled.lock().unwrap().push(model.to_string());
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Speech backend with per-operation scripted outcomes
#[derive(Clone)]
pub struct ScriptedSpeech {
    pub aligned: std::result::Result<Vec<TimedSpan>, SpeechFailure>,
    pub diarized: std::result::Result<Vec<Utterance>, SpeechFailure>,
    pub basic: std::result::Result<Vec<TimedSpan>, SpeechFailure>,
}

impl ScriptedSpeech {
    pub fn spans(texts: &[&str]) -> Vec<TimedSpan> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TimedSpan {
                start: i as f64,
                end: (i + 1) as f64,
                text: text.to_string(),
            })
            .collect()
    }

    /// Healthy full tier: aligned spans plus diarized utterances.
    pub fn healthy(texts: &[&str], speakers: &[&str]) -> Self {
        let spans = Self::spans(texts);
        let diarized = spans
            .iter()
            .zip(speakers.iter().cycle())
            .map(|(span, speaker)| Utterance {
                start: span.start,
                end: span.end,
                speaker: speaker.to_string(),
                text: span.text.clone(),
            })
            .collect();
        Self {
            aligned: Ok(spans.clone()),
            diarized: Ok(diarized),
            basic: Ok(spans),
        }
    }

    pub fn with_diarization_failure(mut self, failure: SpeechFailure) -> Self {
        self.diarized = Err(failure);
        self
    }

    pub fn with_aligned_failure(mut self, failure: SpeechFailure) -> Self {
        self.aligned = Err(failure);
        self
    }

    pub fn with_basic_failure(mut self, failure: SpeechFailure) -> Self {
        self.basic = Err(failure);
        self
    }
}

#[async_trait]
impl SpeechServicePort for ScriptedSpeech {
    async fn recognize_aligned(
        &self,
        _audio_path: &Path,
        _config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure> {
        self.aligned.clone()
    }

    async fn diarize(
        &self,
        _audio_path: &Path,
        _spans: &[TimedSpan],
        _config: &SpeechConfig,
    ) -> std::result::Result<Vec<Utterance>, SpeechFailure> {
        self.diarized.clone()
    }

    async fn recognize_basic(
        &self,
        _audio_path: &Path,
        _config: &SpeechConfig,
    ) -> std::result::Result<Vec<TimedSpan>, SpeechFailure> {
        self.basic.clone()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Mock storage implementation for testing
#[derive(Clone, Default)]
pub struct MockStorage {
    meetings: Arc<Mutex<HashMap<String, MeetingState>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_count(&self) -> usize {
        self.meetings.lock().unwrap().len()
    }
}

#[async_trait]
impl StoragePort for MockStorage {
    async fn save_meeting(&self, meeting: &MeetingState) -> Result<String> {
        self.meetings
            .lock()
            .unwrap()
            .insert(meeting.id.clone(), meeting.clone());
        Ok(meeting.id.clone())
    }

    async fn get_meeting(&self, id: &str) -> Result<Option<MeetingState>> {
        Ok(self.meetings.lock().unwrap().get(id).cloned())
    }

    async fn list_meetings(&self, limit: u32) -> Result<Vec<MeetingSummary>> {
        let meetings = self.meetings.lock().unwrap();
        let mut list: Vec<_> = meetings.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(list
            .into_iter()
            .take(limit as usize)
            .map(|m| MeetingSummary {
                id: m.id.clone(),
                created_at: m.created_at,
                input_kind: m.input_kind,
                transcript_preview: m.transcript_raw.chars().take(100).collect(),
                model_used: m.model_used.clone(),
            })
            .collect())
    }
}
