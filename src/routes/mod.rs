//! Route modules for PDF Share Server

pub mod comments;
pub mod extract;
pub mod health;
pub mod pdf;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_max_bytes = state.config().server.upload_max_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .nest("/api/pdf", pdf::router(upload_max_bytes))
        .nest("/api/comments", comments::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
