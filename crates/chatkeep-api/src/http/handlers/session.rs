//! Session HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/session/load?session_id=   - Load a stored transcript
//! - POST   /api/session/save               - Replace a stored transcript
//! - DELETE /api/session/delete?session_id= - Delete a stored transcript
//! - GET    /api/session/list               - List stored session keys

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use chatkeep_core::session::store::SessionStore;
use chatkeep_types::message::{find_system_message, Transcript};
use chatkeep_types::error::ChatError;
use chatkeep_types::session::SessionKey;

use crate::http::error::AppError;
use crate::http::response::{
    SessionListResponse, SessionLoadResponse, SessionRef, StatusResponse,
};
use crate::state::AppState;

/// Query string carrying a raw session identifier.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: String,
}

/// Request body for an explicit save.
#[derive(Debug, Deserialize)]
pub struct SaveSessionRequest {
    pub session_id: String,
    pub history: Transcript,
}

fn resolve_key(raw: &str) -> Result<SessionKey, AppError> {
    let key = SessionKey::parse(raw)?;
    if key.was_altered() {
        tracing::warn!(session_id = raw, key = %key, "Session ID sanitized");
    }
    Ok(key)
}

/// GET /api/session/load
///
/// A missing or empty transcript is reported as `loaded: false`.
pub async fn load_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionLoadResponse>, AppError> {
    let key = resolve_key(&query.session_id)?;
    let history = state.store().load(&key).await?.unwrap_or_default();
    let loaded = !history.is_empty();

    tracing::debug!(key = %key, messages = history.len(), loaded, "Session loaded");

    Ok(Json(SessionLoadResponse {
        session: SessionRef::new(&query.session_id, &key),
        session_id: query.session_id,
        history,
        loaded,
    }))
}

/// POST /api/session/save
///
/// Saves unconditionally, whether or not context is enabled. History may
/// only carry user and assistant turns.
pub async fn save_session(
    State(state): State<AppState>,
    Json(req): Json<SaveSessionRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    let key = resolve_key(&req.session_id)?;
    if let Some(index) = find_system_message(&req.history) {
        return Err(ChatError::InvalidHistory { index }.into());
    }
    state.store().save(&key, &req.history).await?;

    tracing::info!(key = %key, messages = req.history.len(), "Session saved");

    Ok(Json(
        StatusResponse::ok(format!("Session {} saved successfully", req.session_id))
            .with_session(SessionRef::new(&req.session_id, &key)),
    ))
}

/// DELETE /api/session/delete
pub async fn delete_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let key = resolve_key(&query.session_id)?;

    if !state.store().delete(&key).await? {
        return Err(AppError::NotFound("Session not found".to_string()));
    }

    tracing::info!(key = %key, "Session deleted");

    Ok(Json(
        StatusResponse::ok(format!("Session {} deleted successfully", query.session_id))
            .with_session(SessionRef::new(&query.session_id, &key)),
    ))
}

/// GET /api/session/list
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = state.store().list().await?;
    Ok(Json(SessionListResponse { sessions }))
}
