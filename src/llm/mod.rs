//! LLM integration for structured metadata extraction.
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Mistral by
//! default) or a local Ollama instance.

mod client;

pub use client::{LlmClient, LlmConfig, LlmError, LlmProvider, DEFAULT_METADATA_PROMPT};
