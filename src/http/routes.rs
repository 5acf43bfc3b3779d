use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Uploads larger than this are rejected outright.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Pronunciation analysis
        .route("/analyze", post(handlers::analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // The mobile app is served from a different origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
