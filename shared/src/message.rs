//! Message-bus event types
//!
//! These types are shared between the server and clients for in-process
//! (broadcast) communication. The bus carries two kinds of traffic:
//! resource-change sync signals for live views, and user-facing
//! notifications emitted by workflow transitions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Bus event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// System notification
    Notification = 1,
    /// Resource sync signal
    Sync = 4,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Notification => write!(f, "notification"),
            EventType::Sync => write!(f, "sync"),
        }
    }
}

/// Resource-change payload broadcast after every mutating operation
///
/// Version numbers increase monotonically per resource so clients can
/// discard stale updates that arrive out of order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type, e.g. "financial_record", "monthly_summary"
    pub resource: String,
    /// Monotonic per-resource version
    pub version: u64,
    /// Change action: "created", "updated", "deleted"
    pub action: String,
    /// Resource ID
    pub id: String,
    /// Resource data (None for deletions)
    pub data: Option<serde_json::Value>,
}

/// User-facing notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Notification category, e.g. "finance"
    pub category: String,
    /// Target identifier (franchise ID, admin inbox, ...)
    pub target_id: String,
    pub title: String,
    pub message: String,
    /// "low" | "normal" | "high"
    pub priority: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Envelope carried on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    pub event_type: EventType,
    /// Serialized payload
    pub payload: serde_json::Value,
    /// Message ID for tracing
    pub request_id: Uuid,
    /// Creation timestamp (unix millis)
    pub created_at: i64,
}

impl BusMessage {
    fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            request_id: Uuid::new_v4(),
            created_at: crate::util::now_millis(),
        }
    }

    /// Build a sync message from a payload
    pub fn sync(payload: &SyncPayload) -> Self {
        Self::new(
            EventType::Sync,
            serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        )
    }

    /// Build a notification message from a payload
    pub fn notification(payload: &NotificationPayload) -> Self {
        Self::new(
            EventType::Notification,
            serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        )
    }

    /// Decode the payload into a concrete type
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_message_round_trips() {
        let payload = SyncPayload {
            resource: "financial_record".into(),
            version: 3,
            action: "created".into(),
            id: "financial_record:abc".into(),
            data: None,
        };
        let msg = BusMessage::sync(&payload);
        assert_eq!(msg.event_type, EventType::Sync);

        let decoded: SyncPayload = msg.decode().unwrap();
        assert_eq!(decoded.resource, "financial_record");
        assert_eq!(decoded.version, 3);
    }

    #[test]
    fn decode_wrong_shape_returns_none() {
        let payload = NotificationPayload {
            category: "finance".into(),
            target_id: "f1".into(),
            title: "t".into(),
            message: "m".into(),
            priority: "normal".into(),
            metadata: serde_json::Value::Null,
        };
        let msg = BusMessage::notification(&payload);
        assert!(msg.decode::<SyncPayload>().is_none());
    }
}
