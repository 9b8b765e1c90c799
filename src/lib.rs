//! Meeting Steward
//!
//! A local-first meeting analysis pipeline. An audio recording or raw
//! transcript is pushed through a fixed sequence of stages — transcription,
//! summarization, decision extraction, action item extraction — each backed
//! by a local LLM, with every inter-stage hand-off recorded in an
//! append-only message log and the finished result persisted to SQLite.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod utils;
