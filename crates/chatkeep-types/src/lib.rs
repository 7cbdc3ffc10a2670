//! Shared domain types for chatkeep.
//!
//! Messages, transcripts, session keys, the process-wide chat configuration,
//! LLM request/response shapes, and the error taxonomy used by every other
//! crate in the workspace.
//!
//! Zero infrastructure dependencies -- only serde, thiserror, secrecy.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod session;
