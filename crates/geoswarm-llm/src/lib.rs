//! Client for an OpenAI-compatible chat-completions service.
//!
//! Every campaign stage funnels through this crate: one call in, one
//! (optionally schema-constrained) completion out. Upstream failures and
//! malformed output are distinct error variants so callers can tell a flaky
//! service apart from a broken response contract.

mod client;
mod error;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, JsonSchemaSpec, ResponseFormat};
