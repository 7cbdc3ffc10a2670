//! Infrastructure layer for chatkeep.
//!
//! Contains implementations of the ports defined in `chatkeep-core`:
//! the JSON-file session store, the OpenAI chat provider, and the
//! environment-backed configuration source.

pub mod config;
pub mod llm;
pub mod storage;
