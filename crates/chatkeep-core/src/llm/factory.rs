//! Provider construction from a config snapshot.
//!
//! Providers are built per turn from whatever snapshot is active, so a config
//! reload (new key, new model) applies to the very next request.

use chatkeep_types::config::ChatConfig;
use chatkeep_types::llm::LlmError;

use super::box_provider::BoxLlmProvider;

/// Builds the provider used for one chat turn.
///
/// Object-safe so application state can hold `Arc<dyn ProviderFactory>`.
pub trait ProviderFactory: Send + Sync {
    /// Fails with [`LlmError::MissingApiKey`] when the snapshot has no credential.
    fn build(&self, config: &ChatConfig) -> Result<BoxLlmProvider, LlmError>;
}
