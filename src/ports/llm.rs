/// LLM service port trait
///
/// Defines the interface for text-generation backends.
/// Implementation: Ollama adapter.
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A role-tagged message in a chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Port trait for text-generation services
#[async_trait]
pub trait LlmServicePort: Send + Sync {
    /// Send one chat completion request. Streaming disabled; a single
    /// generated message is returned.
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<String>;

    /// Names of the models the backend currently knows.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Ask the backend to fetch a model it does not have yet.
    async fn pull_model(&self, model: &str) -> Result<()>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}
