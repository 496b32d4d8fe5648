//! The relay runner: accept loop, per-connection reader tasks.
//!
//! [`Relay`] owns the registry, the publish side of the relay channel,
//! and the operational counters. It is constructed once at startup and
//! passed as an `Arc` to the loops and the HTTP surface; there are no
//! ambient globals.

use crate::channel::{PublishOutcome, RelaySender};
use crate::config::{Config, EnvInfo};
use crate::error::Result;
use crate::registry::ConnectionRegistry;
use crate::transport::{Conn, Listener};
use link_types::{Envelope, PeerId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Operational metrics for monitoring relay activity.
///
/// All counters are monotonically increasing (reset only on restart).
/// Thread-safe via `AtomicU64` — no locks needed for incrementing.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total connections accepted.
    pub connections_total: AtomicU64,
    /// Total envelopes the consumer accepted.
    pub messages_relayed: AtomicU64,
    /// Total envelopes dropped because the consumer was not ready.
    pub messages_dropped: AtomicU64,
    /// Total reader terminations (peer disconnects and I/O errors).
    pub read_errors: AtomicU64,
}

/// The relay endpoint.
pub struct Relay {
    config: Config,
    env: EnvInfo,
    registry: ConnectionRegistry,
    outbound: RelaySender,
    metrics: RelayMetrics,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Relay {
    /// Create a new relay with the given config, environment snapshot,
    /// and publish side of the relay channel.
    pub fn new(config: Config, env: EnvInfo, outbound: RelaySender) -> Self {
        Self {
            config,
            env,
            registry: ConnectionRegistry::new(),
            outbound,
            metrics: RelayMetrics::default(),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the environment snapshot captured at startup.
    pub fn env(&self) -> &EnvInfo {
        &self.env
    }

    /// Get the connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// Accept inbound connections until the listener fails.
    ///
    /// Each accepted connection is registered under its peer identity
    /// and handed its own reader task. A listener error terminates
    /// this loop permanently and is returned to the caller;
    /// already-open connections and the relay channel are unaffected.
    pub async fn run_accept_loop(
        self: Arc<Self>,
        listener: impl Listener + 'static,
    ) -> Result<()> {
        loop {
            let conn = listener.accept().await?;

            let peer = conn.remote_id();
            let conn: Arc<dyn Conn> = Arc::from(conn);

            if self.registry.put(peer, conn.clone()).is_some() {
                // The superseded reader keeps running until its own
                // read fails.
                tracing::warn!("Peer {peer} reconnected, replacing its previous connection");
            }
            self.metrics.connections_total.fetch_add(1, Ordering::Relaxed);
            tracing::info!("Accepted connection from {peer}");

            let relay = self.clone();
            tokio::spawn(async move {
                relay.read_loop(peer, conn).await;
            });
        }
    }

    /// Read from one connection until it errors or closes.
    ///
    /// Every successful read becomes one envelope and one non-blocking
    /// publish attempt; a drop is not an error and the loop keeps
    /// reading. A read error deregisters the connection and ends the
    /// task — the expected path for peer disconnect.
    async fn read_loop(self: Arc<Self>, peer: PeerId, conn: Arc<dyn Conn>) {
        let mut buf = vec![0u8; self.config.relay.read_buffer_size.max(1)];

        loop {
            let n = match conn.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!("Read from {peer} failed: {e}");
                    self.registry.remove(&peer);
                    self.metrics.read_errors.fetch_add(1, Ordering::Relaxed);
                    conn.close().await;
                    return;
                }
            };

            let envelope = Envelope::new(&peer, &buf[..n]);
            let serialized = match envelope.to_json() {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to serialize envelope from {peer}: {e}");
                    continue;
                }
            };

            match self.outbound.try_publish(serialized) {
                PublishOutcome::Delivered => {
                    self.metrics.messages_relayed.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Relayed {n} bytes from {peer}");
                }
                PublishOutcome::Dropped => {
                    self.metrics.messages_dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Consumer not ready, dropped {n} bytes from {peer}");
                }
            }
        }
    }
}
