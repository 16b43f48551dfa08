//! Local LLM enrichment over the Ollama HTTP API.
//!
//! Builds marketplace description prompts from listing records and talks
//! to a local Ollama server for model listing, generation, and pulls.
//! Everything stays on the user's machine.

pub mod client;
pub mod error;
pub mod prompt;

pub use client::{ModelInfo, OllamaClient};
pub use error::{LlmError, Result};
pub use prompt::{build_prompt, DEFAULT_INSTRUCTIONS};
