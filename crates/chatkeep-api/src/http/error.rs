//! Application error type mapping to HTTP status codes.
//!
//! Body shape: `{"error": {"code": "...", "message": "..."}}`. A persistence
//! failure after a successful provider call also carries `"reply"`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chatkeep_types::error::{ChatError, StoreError};
use chatkeep_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Session store errors.
    Store(StoreError),
    /// Chat turn errors.
    Chat(ChatError),
    /// The addressed session does not exist (delete only).
    NotFound(String),
    /// Generic internal error.
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Store(StoreError::InvalidIdentifier(_))
            | AppError::Chat(ChatError::InvalidIdentifier(_)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SESSION_ID",
                "Session ID must contain at least one letter, digit, '-' or '_'".to_string(),
            ),
            AppError::Chat(e @ ChatError::InvalidHistory { .. }) => {
                (StatusCode::BAD_REQUEST, "INVALID_HISTORY", e.to_string())
            }
            AppError::Store(e @ StoreError::Read { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_READ_ERROR", e.to_string())
            }
            AppError::Store(e @ StoreError::Write { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_WRITE_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Provider(e)) if e.is_precondition() => {
                (StatusCode::PRECONDITION_FAILED, "PROVIDER_NOT_CONFIGURED", e.to_string())
            }
            AppError::Chat(ChatError::Provider(e @ LlmError::Timeout { .. })) => {
                (StatusCode::GATEWAY_TIMEOUT, "PROVIDER_TIMEOUT", e.to_string())
            }
            AppError::Chat(ChatError::Provider(e)) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", e.to_string())
            }
            AppError::Chat(e @ ChatError::Persistence { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR", e.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), code, "{message}");
        }

        let mut body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        if let AppError::Chat(ChatError::Persistence { reply, .. }) = &self {
            body["reply"] = json!(reply);
        }

        (status, Json(body)).into_response()
    }
}
