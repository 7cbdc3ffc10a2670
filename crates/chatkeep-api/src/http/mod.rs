//! HTTP/REST API layer for chatkeep.
//!
//! Axum-based JSON API under `/api/` with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
