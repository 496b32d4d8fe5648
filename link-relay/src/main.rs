//! link-relay binary entry point.
//!
//! Usage:
//! ```bash
//! link-relay --config skylink.toml
//! ```

use anyhow::{Context, Result};
use skylink_relay::channel::relay_channel;
use skylink_relay::config::{Config, EnvInfo};
use skylink_relay::http;
use skylink_relay::relay::Relay;
use skylink_relay::transport::iroh::IrohListener;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("link-relay v{}", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    let env = EnvInfo::from_env();

    // The relay channel: bounded, exactly one local consumer.
    let (sender, mut rx) = relay_channel(config.relay.channel_capacity);

    let relay = Arc::new(Relay::new(config, env, sender));

    // The local consumer. The presentation layer attaches here; until
    // one exists, delivered envelopes are logged.
    tokio::spawn(async move {
        while let Some(envelope) = rx.recv().await {
            tracing::info!("Delivered to consumer: {envelope}");
        }
    });

    // Bind the overlay listener and start accepting peers.
    let listener = IrohListener::bind(&relay.config().server)
        .await
        .context("Failed to bind overlay endpoint")?;
    tracing::info!("Relay identity: {}", listener.local_id());
    let accept_relay = relay.clone();
    tokio::spawn(async move {
        if let Err(e) = accept_relay.run_accept_loop(listener).await {
            tracing::error!("Listener failed, no longer accepting peers: {e}");
        }
    });

    // HTTP control surface; a bind failure here is fatal.
    http::health::init_start_time();
    let app = http::build_router(relay.clone());
    let addr = relay.config().http.bind_address.clone();
    let http_listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    tracing::info!("Serving control surface on {addr}");
    axum::serve(http_listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

fn get_config_path() -> PathBuf {
    std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("skylink.toml"))
}
