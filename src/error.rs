/// Error types for Meeting Steward
///
/// Uses thiserror for ergonomic error handling with proper Display implementations.
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required precondition was not met. Fatal; never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single LLM call failed. Recovered by retry inside the generation client.
    #[error("LLM service error: {0}")]
    Llm(String),

    /// All retry attempts for one generation call failed. Fatal to the run.
    #[error("generation exhausted after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<AppError>,
    },

    /// The backend returned text that could not be parsed as structured data.
    /// Stages recover by substituting a degraded artifact.
    #[error("malformed response from model: {raw}")]
    MalformedResponse { raw: String },

    /// Audio could not be loaded or normalized, or every transcription tier
    /// failed. Fatal; never retried.
    #[error("Audio acquisition error: {0}")]
    Acquisition(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error aborts a pipeline run outright.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Exhausted { .. } | AppError::Acquisition(_)
        )
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_carries_attempt_count() {
        let err = AppError::Exhausted {
            attempts: 3,
            source: Box::new(AppError::Llm("connection refused".to_string())),
        };
        let text = err.to_string();
        assert!(text.contains("3 attempts"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_response_is_not_fatal() {
        let err = AppError::MalformedResponse {
            raw: "not json".to_string(),
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_validation_is_fatal() {
        assert!(AppError::Validation("no transcript".to_string()).is_fatal());
        assert!(!AppError::Llm("timeout".to_string()).is_fatal());
    }
}
