//! Notification Model
//!
//! Persisted notification requests emitted by closing-workflow transitions.
//! Delivery is fire-and-forget: a failed write never affects the state
//! transition that produced it.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type NotificationId = RecordId;

/// Primary notification category for finance workflow events
pub const CATEGORY_FINANCE: &str = "finance_workflow";
/// Fallback category understood by pre-rework notification readers
pub const CATEGORY_FINANCE_LEGACY: &str = "finance";

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<NotificationId>,

    pub category: String,
    /// Target identifier (franchise ID or the admin inbox)
    pub target_id: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,

    #[serde(default)]
    pub metadata: serde_json::Value,

    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub read: bool,

    pub created_at: Option<i64>,
}

/// A notification request before persistence
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub target_id: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub metadata: serde_json::Value,
}

impl NotificationRequest {
    pub fn new(
        target_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            title: title.into(),
            message: message.into(),
            priority: NotificationPriority::Normal,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
