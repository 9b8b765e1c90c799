//! Application configuration
//!
//! One `AppConfig` value is constructed at process start and passed by
//! reference into the adapters and the orchestrator. Environment variables
//! override the defaults.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the pipeline and its backends.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ollama API endpoint.
    pub ollama_host: String,

    /// Default LLM model name.
    pub model_name: String,

    /// Base URL of the WhisperX transcription server.
    pub speech_host: String,

    /// SQLite database path.
    pub db_path: PathBuf,

    /// Default sampling temperature for LLM calls.
    pub temperature: f32,

    /// Maximum attempts per generation call.
    pub max_attempts: u32,

    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay: Duration,

    /// Per-request timeout for LLM calls.
    pub llm_timeout: Duration,

    /// Per-request timeout for speech calls (large audio bodies).
    pub speech_timeout: Duration,

    /// Transcription language hint.
    pub language: Option<String>,

    /// Target sample rate for normalized audio.
    pub sample_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_host: "http://localhost:11434".to_string(),
            model_name: "llama3.2".to_string(),
            speech_host: "http://localhost:9000".to_string(),
            db_path: PathBuf::from("data/steward.db"),
            temperature: 0.1,
            max_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            llm_timeout: Duration::from_secs(120),
            speech_timeout: Duration::from_secs(300),
            language: Some("en".to_string()),
            sample_rate: 16_000,
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("STEWARD_OLLAMA_HOST") {
            config.ollama_host = host;
        }
        if let Ok(model) = std::env::var("STEWARD_MODEL") {
            config.model_name = model;
        }
        if let Ok(host) = std::env::var("STEWARD_SPEECH_HOST") {
            config.speech_host = host;
        }
        if let Ok(path) = std::env::var("STEWARD_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(temp) = std::env::var("STEWARD_TEMPERATURE") {
            if let Ok(parsed) = temp.parse() {
                config.temperature = parsed;
            }
        }
        if let Ok(attempts) = std::env::var("STEWARD_MAX_ATTEMPTS") {
            if let Ok(parsed) = attempts.parse() {
                config.max_attempts = parsed;
            }
        }
        if let Ok(lang) = std::env::var("STEWARD_LANGUAGE") {
            config.language = Some(lang);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.sample_rate, 16_000);
        assert_eq!(config.retry_base_delay, Duration::from_secs(1));
    }
}
