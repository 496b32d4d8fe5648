//! Envelope - the unit forwarded to the local consumer per inbound read.

use serde::{Deserialize, Serialize};

use crate::PeerId;

/// A message envelope: one inbound read, wrapped with its sender.
///
/// Serialized as `{"sender": "<hex peer id>", "message": "<payload>"}`
/// and published to the relay channel. The envelope lives for a single
/// publish attempt; it is dropped if the consumer is not ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The sending peer, rendered as fixed-length hex.
    pub sender: String,
    /// The payload bytes as read. Invalid UTF-8 is carried lossily,
    /// matching what JSON can represent.
    pub message: String,
}

impl Envelope {
    /// Wrap one inbound read from `peer`.
    pub fn new(peer: &PeerId, payload: &[u8]) -> Self {
        Self {
            sender: peer.to_string(),
            message: String::from_utf8_lossy(payload).into_owned(),
        }
    }

    /// Serialize to the JSON wire form published on the relay channel.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
