//! Liveness endpoint, served without authentication.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Crate version of the running server.
    pub version: &'static str,
}

impl HealthResponse {
    const CURRENT: Self = Self {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    };
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(|| async { Json(HealthResponse::CURRENT) }))
}
