pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::letters::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/letters/template", get(handlers::handle_template))
        .route("/api/v1/letters/preview", post(handlers::handle_preview))
        .route("/api/v1/letters/generate", post(handlers::handle_generate))
        .route("/api/v1/letters/archive", post(handlers::handle_archive))
        .route("/api/v1/letters/file", post(handlers::handle_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
