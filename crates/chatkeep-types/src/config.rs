//! Process-wide chat configuration.
//!
//! A [`ChatConfig`] is an immutable snapshot. Reloading builds a new snapshot
//! and swaps it in whole; nothing mutates a snapshot after construction.

use std::time::Duration;

use secrecy::SecretString;

/// Runtime settings for chat turns.
///
/// Does not derive Clone: snapshots are shared behind `Arc`. Debug output
/// redacts the API key.
#[derive(Debug)]
pub struct ChatConfig {
    /// Provider credential. Required for any chat call.
    pub api_key: Option<SecretString>,
    /// Prepended to every request as the system message.
    pub system_prompt: String,
    /// Upstream model identifier.
    pub model: String,
    /// Whether history is sent upstream and turns are persisted.
    pub context_enabled: bool,
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Deadline for a single provider call.
    pub request_timeout: Duration,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ChatConfig {
    pub const DEFAULT_SYSTEM_PROMPT: &'static str = "You are a helpful assistant.";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_TEMPERATURE: f64 = 0.7;
    pub const DEFAULT_MAX_TOKENS: u32 = 2000;

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            system_prompt: Self::DEFAULT_SYSTEM_PROMPT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            context_enabled: true,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            temperature: Self::DEFAULT_TEMPERATURE,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }
}
