//! # Galway Bus
//!
//! Webhook service for the Galway bus voice assistant.
//!
//! # Environment Variables
//!
//! - `PORT`: Server port (default: 8080)
//! - `GALWAY_BUS_URL`: Galway bus API (default: <http://galwaybus.herokuapp.com>)
//! - `HTTP_TIMEOUT_SECS`: Timeout for calls to the bus API (default: 10)
//! - `RUST_LOG`: Log filter (default: info)

mod config;
mod http;
mod provider;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::config::Settings;
use crate::provider::Provider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default().with(filter).with(fmt::layer()).init();

    let settings = Settings::from_env();
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(bus_api = %settings.galway_bus_url, timeout = ?settings.http_timeout, "starting");

    let provider = Provider::new(settings)?;
    let app = http::router(provider);

    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown()).await.context("serving")?;
    Ok(())
}

async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}
