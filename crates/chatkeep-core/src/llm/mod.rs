//! LLM provider abstractions for chatkeep.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderFactory`: builds a provider from the active config snapshot

pub mod box_provider;
pub mod factory;
pub mod provider;
