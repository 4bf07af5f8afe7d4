//! Room monitor entry point.
//!
//! Wires the occupant state engine to its two transports: the UDP
//! detection feed from the upstream video pipeline, and the HTTP API
//! consumed by ward tablets. Configuration comes from the
//! environment: `APP_HTTP_PORT` (default 8080) and
//! `APP_DETECTION_PORT` (default 5600).

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use room_sentinel::api::{create_router, AppState};
use room_sentinel::config::EngineConfig;
use room_sentinel::ingest::{self, IngestConfig};

fn env_port(name: &str, default: u16) -> anyhow::Result<u16> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .with_context(|| format!("{name} is not a valid port: {value}")),
        _ => Ok(default),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    tracing::info!(version = room_sentinel::VERSION, "room sentinel starting");

    let http_port = env_port("APP_HTTP_PORT", 8080)?;
    let feed_port = env_port("APP_DETECTION_PORT", 5600)?;

    let state = AppState::new(EngineConfig::default());

    let feed_state = state.clone();
    let feed = tokio::spawn(async move {
        let config = IngestConfig {
            port: feed_port,
            ..Default::default()
        };
        if let Err(err) = ingest::run(feed_state, config).await {
            tracing::error!(%err, "detection feed terminated");
        }
    });

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP port {http_port}"))?;
    tracing::info!(%addr, "monitor API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            tracing::info!("shutdown signal received");
        })
        .await
        .context("HTTP server failed")?;

    feed.abort();
    Ok(())
}
