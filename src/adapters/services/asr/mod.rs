//! Speech service adapters
//!
//! Implementations of the SpeechServicePort trait.

pub mod whisperx;

pub use whisperx::WhisperXService;
