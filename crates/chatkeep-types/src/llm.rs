//! LLM request/response types for chatkeep.
//!
//! These model the single non-streaming chat completion the service makes per
//! turn, plus the errors a provider can report.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Request to an LLM provider for a completion.
///
/// `messages` is the full outgoing sequence: system prompt first, then
/// history, then the new user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY not found. Set it in your .env file or environment variables.")]
    MissingApiKey,

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("context length exceeded: {0}")]
    ContextLengthExceeded(String),

    #[error("provider did not respond within {after:?}")]
    Timeout { after: Duration },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Whether the failure is a local precondition rather than an upstream fault.
    pub fn is_precondition(&self) -> bool {
        matches!(self, LlmError::MissingApiKey)
    }
}
