//! # typegate-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to a configurable port (default
//! 8080).

use typegate_api::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.port,
        schema_mode = %config.schema_mode,
        validation_mode = %config.validation_mode,
        registry = %config.registry.base_url,
        "starting typegate"
    );

    let state = AppState::new(&config).map_err(|e| {
        tracing::error!("failed to build registry client: {e}");
        anyhow::anyhow!(e)
    })?;

    let app = typegate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("typegate API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
