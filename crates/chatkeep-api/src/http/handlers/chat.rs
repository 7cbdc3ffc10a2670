//! Chat HTTP handler.
//!
//! - POST /api/chat - Run one chat turn, persisting it when context is enabled

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use chatkeep_core::chat::orchestrator::ChatTurn;
use chatkeep_types::error::ChatError;
use chatkeep_types::message::Transcript;

use crate::http::error::AppError;
use crate::http::response::{ChatResponse, SessionRef};
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Option<Transcript>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/chat
///
/// The provider is built from the config snapshot taken at the start of the
/// request, so a concurrent reload never splits one turn across two configs.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let config = state.config.current();
    let provider = state.providers.build(&config).map_err(ChatError::from)?;

    let session_id = req.session_id.filter(|id| !id.is_empty());
    let turn = ChatTurn {
        message: req.message,
        history: req.history,
        session_id: session_id.clone(),
    };

    let reply = state.orchestrator.respond(&provider, &config, turn).await?;

    let session = reply
        .saved
        .as_ref()
        .zip(session_id.as_deref())
        .map(|(saved, raw)| SessionRef::new(raw, &saved.key));

    Ok(Json(ChatResponse {
        reply: reply.reply,
        session,
    }))
}
