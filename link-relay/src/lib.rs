//! # link-relay
//!
//! Relay endpoint for the Skylink overlay network.
//!
//! This crate implements a relay that:
//! - Accepts iroh QUIC connections from overlay peers
//! - Tracks live connections by peer identity
//! - Forwards every inbound read to a single local consumer (e.g. a UI)
//! - Never lets a slow or absent consumer stall a connection
//!
//! ## Architecture
//!
//! ```text
//! Peer A ──┐
//!          │  iroh QUIC          ┌──────────────────────────┐
//! Peer B ──┼────────────────────►│        link-relay        │
//!          │                     │  accept loop             │
//! Peer C ──┘                     │  registry (peer → conn)  │
//!                                │  reader task per conn    │
//!                                └────────────┬─────────────┘
//!                                             │ bounded channel,
//!                                             │ non-blocking publish
//!                                             ▼
//!                                      local consumer (UI)
//! ```
//!
//! Each accepted connection gets its own reader task. Reads are wrapped
//! into `{sender, message}` envelopes and published with `try_publish`;
//! when the consumer is not ready the envelope is dropped, never queued
//! indefinitely.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod relay;
pub mod transport;
