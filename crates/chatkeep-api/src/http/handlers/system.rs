//! Health and configuration handlers.

use axum::extract::State;
use axum::Json;

use crate::http::error::AppError;
use crate::http::response::StatusResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok("Server is running"))
}

/// POST /api/reload_config
///
/// On failure the previous configuration stays active.
pub async fn reload_config(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    state
        .config
        .reload(state.config_source.as_ref())
        .map_err(|e| AppError::Internal(format!("Failed to reload: {e}")))?;

    Ok(Json(StatusResponse::ok(
        "Environment variables reloaded successfully",
    )))
}
