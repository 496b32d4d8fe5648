//! Iroh QUIC transport - the production inbound boundary.
//!
//! Binds an iroh endpoint on the relay's one logical application port
//! (ALPN `/skylink/44`) and yields authenticated connections. The peer
//! identity is the remote endpoint's Ed25519 public key.

use super::{Conn, Listener, TransportError};
use async_trait::async_trait;
use iroh::endpoint::{Connection, RecvStream, SendStream};
use iroh::Endpoint;
use link_types::PeerId;
use std::net::SocketAddrV4;
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Protocol identifier: logical application port 44 on the overlay.
pub const ALPN: &[u8] = b"/skylink/44";

/// Iroh-backed listener.
pub struct IrohListener {
    endpoint: Endpoint,
    local_id: PeerId,
}

impl IrohListener {
    /// Bind an iroh endpoint per the server configuration.
    ///
    /// This may take a few seconds while the endpoint probes relays.
    pub async fn bind(config: &ServerConfig) -> Result<Self, TransportError> {
        let addr = parse_bind_addr(&config.bind_address)?;

        let endpoint = Endpoint::builder()
            .alpns(vec![ALPN.to_vec()])
            .bind_addr(addr)
            .map_err(|e| TransportError::Bind(e.to_string()))?
            .bind()
            .await
            .map_err(|e| TransportError::Bind(e.to_string()))?;

        let local_id = PeerId::from_bytes(endpoint.id().as_bytes())
            .ok_or_else(|| TransportError::Bind("invalid local endpoint id".to_string()))?;

        Ok(Self { endpoint, local_id })
    }

    /// The relay's own identity on the overlay.
    pub fn local_id(&self) -> PeerId {
        self.local_id
    }
}

#[async_trait]
impl Listener for IrohListener {
    async fn accept(&self) -> Result<Box<dyn Conn>, TransportError> {
        let incoming = self
            .endpoint
            .accept()
            .await
            .ok_or(TransportError::ListenerClosed)?;

        let connection = incoming
            .await
            .map_err(|e| TransportError::Accept(e.to_string()))?;

        let peer = PeerId::from_bytes(connection.remote_id().as_bytes())
            .ok_or_else(|| TransportError::Accept("invalid remote endpoint id".to_string()))?;

        Ok(Box::new(IrohConn {
            connection,
            peer,
            streams: Mutex::new(None),
        }))
    }
}

/// One accepted iroh connection.
///
/// Each peer opens a single bidirectional stream after connecting; the
/// stream is accepted lazily on first read so a peer that never opens
/// one cannot stall the accept loop.
#[derive(Debug)]
pub struct IrohConn {
    connection: Connection,
    peer: PeerId,
    // Send half is kept alive but unused; the relay never writes.
    streams: Mutex<Option<(SendStream, RecvStream)>>,
}

#[async_trait]
impl Conn for IrohConn {
    fn remote_id(&self) -> PeerId {
        self.peer
    }

    async fn read(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut guard = self.streams.lock().await;

        let (_, recv) = match guard.as_mut() {
            Some(streams) => streams,
            None => {
                let streams = self
                    .connection
                    .accept_bi()
                    .await
                    .map_err(|e| TransportError::Read(e.to_string()))?;
                guard.insert(streams)
            }
        };

        let n = recv
            .read(buf)
            .await
            .map_err(|e| TransportError::Read(e.to_string()))?
            .unwrap_or(0);

        if n == 0 {
            // Stream finished: the peer is gone.
            return Err(TransportError::ConnectionClosed);
        }

        Ok(n)
    }

    async fn close(&self) {
        self.connection.close(0u32.into(), b"closing");
    }
}

/// Parse a `host:port` bind address into an IPv4 socket address.
fn parse_bind_addr(address: &str) -> Result<SocketAddrV4, TransportError> {
    address
        .parse::<SocketAddrV4>()
        .map_err(|e| TransportError::Bind(format!("invalid bind address {address}: {e}")))
}
