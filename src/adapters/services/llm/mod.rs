//! LLM service adapters
//!
//! Implementations of the LlmServicePort trait.

pub mod ollama;

pub use ollama::OllamaService;
