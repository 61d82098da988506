//! HTTP server entry point.
//!
//! Loads configuration from the environment (and `.env`), builds the router
//! and serves it until Ctrl-C or SIGTERM.

use anyhow::{Context, Result};
use plugy_config::{CorsConfig, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    log_cors_policy(&config.cors);

    let app = plugy_server::app(&config).context("failed to build CORS layer")?;

    info!(
        "Starting {} v{} on {}",
        config.info.title, config.info.version, config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn log_cors_policy(cors: &CorsConfig) {
    info!(
        origins = %cors.allow_origins,
        credentials = cors.allow_credentials,
        methods = %cors.allow_methods,
        headers = %cors.allow_headers,
        "CORS policy"
    );
    if cors.allow_origins.is_any() {
        warn!("CORS accepts any origin; set PLUGY_CORS_ALLOW_ORIGINS in production");
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
