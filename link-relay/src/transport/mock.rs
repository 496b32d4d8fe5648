//! Mock transport for testing.
//!
//! Allows scripting inbound connections and read chunks, and forcing
//! failures, so the accept and reader loops can be exercised without
//! a network.

use super::{Conn, Listener, TransportError};
use async_trait::async_trait;
use link_types::PeerId;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock listener yielding pre-scripted connections.
///
/// `accept()` blocks until a connection is pushed, a failure is
/// forced, or the listener is closed. Clones share state.
#[derive(Debug, Default)]
pub struct MockListener {
    inner: Arc<Mutex<ListenerInner>>,
    notify: Arc<Notify>,
}

#[derive(Debug, Default)]
struct ListenerInner {
    queue: VecDeque<MockConn>,
    fail_next: Option<String>,
    closed: bool,
}

impl MockListener {
    /// Create a new mock listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a connection to be returned by a later `accept()` call.
    pub fn push_conn(&self, conn: MockConn) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.push_back(conn);
        self.notify.notify_one();
    }

    /// Cause the next `accept()` to fail with the given error.
    pub fn fail_next_accept(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next = Some(error.to_string());
        self.notify.notify_one();
    }

    /// Permanently close the listener; pending and future `accept()`
    /// calls return `ListenerClosed`.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.closed = true;
        self.notify.notify_one();
    }
}

impl Clone for MockListener {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            notify: Arc::clone(&self.notify),
        }
    }
}

#[async_trait]
impl Listener for MockListener {
    async fn accept(&self) -> Result<Box<dyn Conn>, TransportError> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(error) = inner.fail_next.take() {
                    return Err(TransportError::Accept(error));
                }
                if let Some(conn) = inner.queue.pop_front() {
                    return Ok(Box::new(conn));
                }
                if inner.closed {
                    return Err(TransportError::ListenerClosed);
                }
            }
            self.notify.notified().await;
        }
    }
}

/// Mock connection with scripted read chunks.
///
/// `read()` blocks until a chunk is pushed or a failure is scripted.
/// Clones share state, so a test can keep scripting reads after the
/// relay owns the boxed connection.
#[derive(Debug)]
pub struct MockConn {
    id: PeerId,
    inner: Arc<Mutex<ConnInner>>,
    notify: Arc<Notify>,
}

#[derive(Debug, Default)]
struct ConnInner {
    chunks: VecDeque<Vec<u8>>,
    // Sticky: once set, every subsequent read fails.
    fail: Option<String>,
    remote_closed: bool,
    local_closed: bool,
}

impl MockConn {
    /// Create a new mock connection for the given peer.
    pub fn new(id: PeerId) -> Self {
        Self {
            id,
            inner: Arc::new(Mutex::new(ConnInner::default())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Queue a chunk of bytes to be returned by a later `read()` call.
    pub fn push_chunk(&self, data: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner.chunks.push_back(data.to_vec());
        self.notify.notify_one();
    }

    /// Fail all reads from now on (transport failure).
    pub fn fail_reads(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail = Some(error.to_string());
        self.notify.notify_one();
    }

    /// Simulate the remote peer closing the connection.
    ///
    /// Queued chunks are still delivered first.
    pub fn close_remote(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.remote_closed = true;
        self.notify.notify_one();
    }

    /// Whether `close()` was called on this connection.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().local_closed
    }
}

impl Clone for MockConn {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            notify: Arc::clone(&self.notify),
        }
    }
}

#[async_trait]
impl Conn for MockConn {
    fn remote_id(&self) -> PeerId {
        self.id
    }

    async fn read(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(error) = &inner.fail {
                    return Err(TransportError::Read(error.clone()));
                }
                if let Some(mut chunk) = inner.chunks.pop_front() {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        // Oversized chunk: deliver the rest on the next read.
                        inner.chunks.push_front(chunk.split_off(n));
                    }
                    return Ok(n);
                }
                if inner.remote_closed || inner.local_closed {
                    return Err(TransportError::ConnectionClosed);
                }
            }
            self.notify.notified().await;
        }
    }

    async fn close(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.local_closed = true;
        self.notify.notify_one();
    }
}
