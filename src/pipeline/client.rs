//! Resilient invocation client for the text-generation backend
//!
//! Wraps every LLM call with an availability check, bounded retries with
//! exponential backoff, and an empty-response guard. Structured extraction
//! of the returned text is a separate, non-retried concern: transport
//! failures are retried here, parse failures degrade in the calling stage.

use crate::error::{AppError, Result};
use crate::ports::llm::{ChatMessage, LlmServicePort};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Client for generation calls against an LLM backend
pub struct GenerationClient {
    llm: Arc<dyn LlmServicePort>,
    max_attempts: u32,
    base_delay: Duration,
}

/// Backoff delay before retrying after the given zero-based attempt.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base * 2u32.saturating_pow(attempt)
}

impl GenerationClient {
    pub fn new(llm: Arc<dyn LlmServicePort>, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            llm,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Check the backend knows the model, pulling it if missing.
    ///
    /// Best effort: any failure here is logged and generation proceeds —
    /// the generation call itself surfaces the real error.
    async fn ensure_model_available(&self, model: &str) {
        let names = match self.llm.list_models().await {
            Ok(names) => names,
            Err(e) => {
                log::warn!("Could not query known models: {}", e);
                return;
            }
        };

        let available = names
            .iter()
            .any(|name| name == model || name.split(':').next() == Some(model));
        if available {
            log::debug!("Model {} is already available", model);
            return;
        }

        log::info!("Model {} not found. Pulling from backend...", model);
        if let Err(e) = self.llm.pull_model(model).await {
            log::warn!("Failed to pull model {}: {}", model, e);
        }
    }

    /// Run one generation request with retries.
    ///
    /// Empty content counts as a failed attempt. After `max_attempts`
    /// failures the last error is returned wrapped in
    /// `AppError::Exhausted`.
    pub async fn generate(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        self.ensure_model_available(model).await;

        let mut last_error = AppError::Llm("no attempts made".to_string());

        for attempt in 0..self.max_attempts {
            match self.llm.chat(messages, model, temperature).await {
                Ok(content) if !content.trim().is_empty() => {
                    log::debug!(
                        "Generation succeeded on attempt {} ({} chars)",
                        attempt + 1,
                        content.len()
                    );
                    return Ok(content);
                }
                Ok(_) => {
                    last_error = AppError::Llm("Empty response from model".to_string());
                }
                Err(e) => {
                    last_error = e;
                }
            }

            log::warn!(
                "Generation attempt {}/{} failed: {}",
                attempt + 1,
                self.max_attempts,
                last_error
            );

            if attempt + 1 < self.max_attempts {
                tokio::time::sleep(backoff_delay(self.base_delay, attempt)).await;
            }
        }

        Err(AppError::Exhausted {
            attempts: self.max_attempts,
            source: Box::new(last_error),
        })
    }
}

/// Strip one leading/trailing fenced block, if present.
///
/// When the trimmed text starts with a fence marker and spans more than two
/// lines, the first and last lines are removed; otherwise the text is
/// returned as-is. Applying this to already-clean text is a no-op.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() > 2 {
            return lines[1..lines.len() - 1].join("\n");
        }
    }
    trimmed.to_string()
}

/// Parse structured data out of raw model output.
///
/// Fails with `AppError::MalformedResponse` carrying the offending text;
/// stages catch that specific error and degrade.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fence(raw);
    serde_json::from_str(&cleaned).map_err(|e| {
        log::warn!("Failed to parse structured response: {}", e);
        AppError::MalformedResponse {
            raw: raw.to_string(),
        }
    })
}
