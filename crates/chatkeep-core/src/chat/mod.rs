//! Chat turn orchestration.

pub mod orchestrator;
