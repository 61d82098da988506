//! HTTP route handlers for the API server.

pub mod openapi;

use axum::Json;

use crate::dto::{HealthResponse, WelcomeResponse};

/// Welcome endpoint.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::default())
}

/// Liveness probe. No dependency checks.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
