pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::render::handlers as render_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Tailoring pipeline
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/rewrite", post(handlers::handle_rewrite))
        .route("/api/v1/tailor", post(handlers::handle_tailor))
        // Document output
        .route("/api/v1/download", post(render_handlers::handle_download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
