//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`.
//! Middleware: CORS (permissive), request tracing.
//!
//! When the web directory exists, the static frontend is served as the
//! fallback with `index.html` for unknown paths. Otherwise only the API is
//! served.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state.web_dir.clone();

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/session/load", get(handlers::session::load_session))
        .route("/session/save", post(handlers::session::save_session))
        .route("/session/delete", delete(handlers::session::delete_session))
        .route("/session/list", get(handlers::session::list_sessions))
        .route("/health", get(handlers::system::health))
        .route("/reload_config", post(handlers::system::reload_config))
        // Keeps unknown API paths out of the frontend fallback.
        .fallback(api_not_found);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match web_dir {
        Some(dir) if dir.is_dir() => {
            let serve_dir = ServeDir::new(&dir).fallback(ServeFile::new(dir.join("index.html")));
            router = router.fallback_service(serve_dir);
            tracing::info!(path = %dir.display(), "Static frontend serving enabled");
        }
        Some(dir) => {
            tracing::warn!(path = %dir.display(), "Web directory not found, serving API only");
        }
        None => {}
    }

    router
}

async fn api_not_found() -> AppError {
    AppError::NotFound("No such API endpoint".to_string())
}
