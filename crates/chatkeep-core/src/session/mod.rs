//! Session persistence abstractions.
//!
//! The `SessionStore` trait is implemented in chatkeep-infra; the orchestrator
//! and HTTP layer only ever see the trait.

pub mod store;
