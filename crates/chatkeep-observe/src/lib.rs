//! Observability setup for chatkeep: structured logging via `tracing`.

pub mod tracing_setup;
