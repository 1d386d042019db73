//! Operations routes
//!
//! Health check endpoint for monitoring. Does not touch the store.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status
    pub status: &'static str,
}

/// Operations routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// Liveness probe
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
