//! HTTP API for the pronunciation analysis service
//!
//! This module provides the upload endpoint used by the mobile app:
//! - POST /analyze - multipart upload (transcript + audio), returns the report
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
