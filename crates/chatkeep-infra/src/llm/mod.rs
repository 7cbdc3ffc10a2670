//! LLM provider implementations.
//!
//! [`OpenAiProviderFactory`] builds an [`OpenAiProvider`] from the active
//! config snapshot for each chat turn.

pub mod openai;

use chatkeep_core::llm::box_provider::BoxLlmProvider;
use chatkeep_core::llm::factory::ProviderFactory;
use chatkeep_types::config::ChatConfig;
use chatkeep_types::llm::LlmError;

use self::openai::OpenAiProvider;

/// Builds OpenAI providers from config snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn build(&self, config: &ChatConfig) -> Result<BoxLlmProvider, LlmError> {
        let api_key = config.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;
        let provider = OpenAiProvider::new(api_key, &config.base_url, &config.model);
        Ok(BoxLlmProvider::new(provider))
    }
}
