//! Health check endpoint.

use crate::relay::Relay;
use axum::{Extension, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Global start time for uptime calculation.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call once at startup).
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Number of registered peer connections.
    pub connections: usize,
    /// Envelopes accepted by the consumer since startup.
    pub messages_relayed: u64,
    /// Envelopes dropped since startup.
    pub messages_dropped: u64,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Health check handler.
pub async fn health_handler(Extension(relay): Extension<Arc<Relay>>) -> Json<HealthStatus> {
    let uptime = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    let m = relay.metrics();
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: relay.registry().len(),
        messages_relayed: m.messages_relayed.load(Ordering::Relaxed),
        messages_dropped: m.messages_dropped.load(Ordering::Relaxed),
        uptime_seconds: uptime,
    })
}
