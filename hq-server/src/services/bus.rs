//! In-process message bus
//!
//! A broadcast channel fanning resource-change and notification events to
//! every subscriber (live feeds, future websocket bridges, tests). Slow
//! subscribers lag and skip rather than block publishers.

use tokio::sync::broadcast;

use shared::message::BusMessage;

/// Buffered messages per subscriber before lagging kicks in
const BUS_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish a message to every current subscriber
    ///
    /// A bus with no subscribers is not an error; the message is dropped.
    pub fn publish(&self, message: BusMessage) {
        match self.tx.send(message) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Bus message published");
            }
            Err(_) => {
                tracing::debug!("Bus message dropped (no subscribers)");
            }
        }
    }

    /// Open a subscription starting at the current position
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::{EventType, SyncPayload};

    #[tokio::test]
    async fn delivers_to_subscribers() {
        let bus = MessageBus::new();
        let mut rx = bus.subscribe();

        bus.publish(BusMessage::sync(&SyncPayload {
            resource: "financial_record".into(),
            version: 1,
            action: "created".into(),
            id: "financial_record:a".into(),
            data: None,
        }));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event_type, EventType::Sync);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let bus = MessageBus::new();
        bus.publish(BusMessage::sync(&SyncPayload {
            resource: "monthly_summary".into(),
            version: 1,
            action: "updated".into(),
            id: "monthly_summary:x".into(),
            data: None,
        }));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
