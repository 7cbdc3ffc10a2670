//! Business logic and port trait definitions for chatkeep.
//!
//! This crate defines the "ports" (`SessionStore`, `LlmProvider`,
//! `ConfigSource`) that the infrastructure layer implements, and the
//! `ChatOrchestrator` that composes them. It depends on `chatkeep-types`,
//! `tracing`, and `tokio` (for the provider timeout only), never on
//! `chatkeep-infra`. Files and network stay in the infrastructure layer.

pub mod chat;
pub mod config;
pub mod llm;
pub mod session;
