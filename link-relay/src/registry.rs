//! Connection registry: the one piece of shared state in the core.
//!
//! A mutex-guarded map from peer identity to live connection, owned by
//! the relay and mutated by the accept loop (insert) and by each
//! reader task (remove on its own identity).

use crate::transport::Conn;
use link_types::PeerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mapping from peer identity to active connection handle.
///
/// At most one live entry per identity: a new connection from the same
/// peer replaces the previous mapping. All mutations go through a
/// single exclusive lock.
#[derive(Default)]
pub struct ConnectionRegistry {
    conns: Mutex<HashMap<PeerId, Arc<dyn Conn>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the mapping for `peer`.
    ///
    /// Returns the displaced connection, if any, so the caller can
    /// log the supersession. The displaced connection is not closed
    /// here; its reader terminates on its own read error.
    pub fn put(&self, peer: PeerId, conn: Arc<dyn Conn>) -> Option<Arc<dyn Conn>> {
        let mut conns = self.conns.lock().unwrap();
        conns.insert(peer, conn)
    }

    /// Delete the mapping for `peer` if present; no-op otherwise.
    pub fn remove(&self, peer: &PeerId) {
        let mut conns = self.conns.lock().unwrap();
        conns.remove(peer);
    }

    /// Number of currently registered connections.
    pub fn len(&self) -> usize {
        self.conns.lock().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `peer` currently has a registered connection.
    pub fn contains(&self, peer: &PeerId) -> bool {
        self.conns.lock().unwrap().contains_key(peer)
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("len", &self.len())
            .finish()
    }
}
