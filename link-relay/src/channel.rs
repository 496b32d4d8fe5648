//! The relay channel: bounded fan-in to the single local consumer.
//!
//! The publish side is deliberately non-blocking. If the consumer is
//! not immediately ready the envelope is dropped, not queued; a slow
//! or absent consumer must never stall a reader.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Outcome of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The consumer accepted the envelope.
    Delivered,
    /// The channel was full (or the consumer is gone); envelope dropped.
    Dropped,
}

/// The publish side of the relay channel, shared by all reader tasks.
#[derive(Debug, Clone)]
pub struct RelaySender {
    tx: mpsc::Sender<String>,
}

impl RelaySender {
    /// Attempt a non-blocking publish of a serialized envelope.
    ///
    /// Never blocks and never fails: contention and a disconnected
    /// consumer both come back as [`PublishOutcome::Dropped`].
    pub fn try_publish(&self, envelope: String) -> PublishOutcome {
        match self.tx.try_send(envelope) {
            Ok(()) => PublishOutcome::Delivered,
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => PublishOutcome::Dropped,
        }
    }
}

/// Create a relay channel with the given capacity (minimum 1).
///
/// The receiver goes to the one local consumer; the sender is cloned
/// into each reader task.
pub fn relay_channel(capacity: usize) -> (RelaySender, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RelaySender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_delivers_when_consumer_ready() {
        let (sender, mut rx) = relay_channel(1);

        let outcome = sender.try_publish("envelope".to_string());
        assert_eq!(outcome, PublishOutcome::Delivered);
        assert_eq!(rx.recv().await.unwrap(), "envelope");
    }

    #[tokio::test]
    async fn publish_to_full_channel_drops() {
        let (sender, _rx) = relay_channel(1);

        assert_eq!(
            sender.try_publish("first".to_string()),
            PublishOutcome::Delivered
        );
        assert_eq!(
            sender.try_publish("second".to_string()),
            PublishOutcome::Dropped
        );
    }

    #[tokio::test]
    async fn publish_after_consumer_gone_drops() {
        let (sender, rx) = relay_channel(1);
        drop(rx);

        assert_eq!(
            sender.try_publish("orphan".to_string()),
            PublishOutcome::Dropped
        );
    }

    #[tokio::test]
    async fn drop_does_not_affect_later_publishes() {
        let (sender, mut rx) = relay_channel(1);

        sender.try_publish("kept".to_string());
        assert_eq!(
            sender.try_publish("dropped".to_string()),
            PublishOutcome::Dropped
        );

        // Consumer catches up; the next publish lands.
        assert_eq!(rx.recv().await.unwrap(), "kept");
        assert_eq!(
            sender.try_publish("next".to_string()),
            PublishOutcome::Delivered
        );
        assert_eq!(rx.recv().await.unwrap(), "next");
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let (sender, mut rx) = relay_channel(0);

        assert_eq!(
            sender.try_publish("still works".to_string()),
            PublishOutcome::Delivered
        );
        assert_eq!(rx.recv().await.unwrap(), "still works");
    }

    #[tokio::test]
    async fn flood_never_blocks_the_publisher() {
        let (sender, _rx) = relay_channel(1);

        // No consumer reading: everything past the first is dropped,
        // and none of the 100 attempts may suspend.
        let mut dropped = 0;
        for i in 0..100 {
            if sender.try_publish(format!("msg {i}")) == PublishOutcome::Dropped {
                dropped += 1;
            }
        }
        assert_eq!(dropped, 99);
    }
}
