//! Transport abstraction for the relay's inbound boundary.
//!
//! The core depends on already-authenticated, already-connected peer
//! sessions; this module is the seam where they come from. The
//! production implementation is iroh QUIC, with a mock for tests.
//!
//! # Design
//!
//! Two object-safe async traits mirror the boundary:
//! - [`Listener`] yields the next inbound connection, forever
//! - [`Conn`] exposes the remote peer identity, a raw byte-stream
//!   read, and close
//!
//! A listener error is fatal for accepting new peers; a connection
//! read error is local to that connection.

pub mod iroh;
mod mock;

pub use mock::{MockConn, MockListener};

use async_trait::async_trait;
use link_types::PeerId;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("bind failed: {0}")]
    Bind(String),

    /// The listener can produce no further connections.
    #[error("listener closed")]
    ListenerClosed,

    /// Accepting a single connection failed.
    #[error("accept failed: {0}")]
    Accept(String),

    /// A connection read failed.
    #[error("read failed: {0}")]
    Read(String),

    /// The remote peer closed the connection.
    #[error("connection closed")]
    ConnectionClosed,
}

/// A source of inbound peer connections on one fixed logical port.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Block until the next authenticated connection arrives.
    ///
    /// Any error here means the listener itself is done; the caller
    /// should stop accepting.
    async fn accept(&self) -> Result<Box<dyn Conn>, TransportError>;
}

/// A live bidirectional byte stream to one remote peer.
#[async_trait]
pub trait Conn: Send + Sync + std::fmt::Debug {
    /// The identity of the remote peer.
    fn remote_id(&self) -> PeerId;

    /// Read a chunk of raw bytes into `buf`.
    ///
    /// Returns the number of bytes read. An error (including remote
    /// close) means the connection is over.
    async fn read(&self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Close the connection.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        assert_eq!(TransportError::ListenerClosed.to_string(), "listener closed");
        assert_eq!(
            TransportError::Read("reset".to_string()).to_string(),
            "read failed: reset"
        );
    }

    #[test]
    fn traits_are_object_safe() {
        fn assert_obj(_: &dyn Listener, _: &dyn Conn) {}
        let _ = assert_obj;
    }
}
