//! Response bodies for the REST API.
//!
//! Success bodies are flat JSON objects; errors use the shape produced by
//! [`AppError`](crate::http::error::AppError).

use chatkeep_types::message::Transcript;
use chatkeep_types::session::SessionKey;
use serde::Serialize;

/// The storage key a request actually addressed.
///
/// `warning` is set when sanitization rewrote the caller's ID, since another
/// raw ID may map to the same key.
#[derive(Debug, Serialize)]
pub struct SessionRef {
    pub session_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SessionRef {
    pub fn new(raw: &str, key: &SessionKey) -> Self {
        let warning = key
            .was_altered()
            .then(|| format!("Session ID '{raw}' was sanitized to '{key}'"));
        Self {
            session_key: key.to_string(),
            warning,
        }
    }
}

/// `{status, message}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub session: Option<SessionRef>,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: message.into(),
            session: None,
        }
    }

    pub fn with_session(mut self, session: SessionRef) -> Self {
        self.session = Some(session);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Present when the turn was persisted.
    #[serde(flatten)]
    pub session: Option<SessionRef>,
}

/// Result of loading a session.
///
/// `session_id` echoes the identifier as the client sent it.
#[derive(Debug, Serialize)]
pub struct SessionLoadResponse {
    pub session_id: String,
    pub history: Transcript,
    pub loaded: bool,
    #[serde(flatten)]
    pub session: SessionRef,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<String>,
}
