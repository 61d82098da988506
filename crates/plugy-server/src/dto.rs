//! Response bodies for the HTTP endpoints.

use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Welcome to Plugy Agent API";
pub const HEALTHY: &str = "healthy";

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE,
        }
    }
}

/// Body of `GET /health`. Orchestrators depend on this shape.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: HEALTHY }
    }
}
