//! Plugy Agent API HTTP front door.
//!
//! Every request passes through the CORS layer before route dispatch.
//!
//! - `GET /` - welcome message
//! - `GET /health` - liveness probe
//! - `GET /openapi.json` - service metadata as an OpenAPI document
//!
//! Unknown paths and methods fall through to axum's default 404/405.

pub mod cors;
pub mod dto;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get;
use axum::Router;
use plugy_config::{ApiInfo, ConfigError, ServerConfig};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use cors::cors_layer;

/// Shared server state accessible from all handlers. Immutable.
#[derive(Debug, Clone, Default)]
pub struct ServerState {
    pub info: ApiInfo,
}

/// Builds the route table. `/health` sits outside the trace layer so probes
/// stay out of the request log.
pub fn router(state: Arc<ServerState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let logged_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/openapi.json", get(handlers::openapi::document))
        .layer(trace_layer);

    Router::new()
        .merge(logged_routes)
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Builds the complete application: state, routes and the CORS layer.
pub fn app(config: &ServerConfig) -> Result<Router, ConfigError> {
    let state = Arc::new(ServerState {
        info: config.info.clone(),
    });
    let cors = cors_layer(&config.cors)?;
    Ok(router(state).layer(cors))
}
