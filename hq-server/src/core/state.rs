use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::message::{BusMessage, SyncPayload};

use crate::core::Config;
use crate::db;
use crate::services::{MessageBus, NotificationService};
use crate::utils::AppError;

/// Resource version manager
///
/// Lock-free per-resource version counters backed by DashMap. Each resource
/// type keeps an independent, atomically incremented version number, used
/// when broadcasting sync messages so clients can order updates.
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// Increment the version of a resource and return the new value
    ///
    /// Unknown resources start from 0 (first increment returns 1).
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current version of a resource, 0 if never incremented
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Server state - shared handles to every service
///
/// `ServerState` is the core data structure of the back-office node. All
/// fields are cheap to clone (Arc-backed), so handlers receive a clone per
/// request.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded database |
/// | message_bus | Arc<MessageBus> | In-process broadcast bus |
/// | notifications | NotificationService | Fire-and-forget notifier |
/// | resource_versions | Arc<ResourceVersions> | Per-resource sync versions |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// In-process message bus
    pub message_bus: Arc<MessageBus>,
    /// Notification emitter
    pub notifications: NotificationService,
    /// Resource version manager (auto-incremented on broadcast_sync)
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// Order of initialization:
    /// 1. Working directory structure
    /// 2. Database (`<work_dir>/database/hq.db`) + schema definition
    /// 3. Services (bus, notifications)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("hq.db");
        let db = db::connect_rocksdb(&db_path.to_string_lossy()).await?;

        Ok(Self::with_db(config.clone(), db))
    }

    /// Build state around an existing database handle (tests use the
    /// in-memory engine here).
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let message_bus = Arc::new(MessageBus::new());
        let notifications = NotificationService::new(db.clone(), message_bus.clone());
        Self {
            config,
            db,
            message_bus,
            notifications,
            resource_versions: Arc::new(ResourceVersions::new()),
        }
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Message bus handle
    pub fn message_bus(&self) -> &Arc<MessageBus> {
        &self.message_bus
    }

    /// Broadcast a resource-change sync message
    ///
    /// Notifies every connected subscriber of a resource mutation. The
    /// version number is auto-incremented through [`ResourceVersions`].
    ///
    /// # Arguments
    /// - `resource`: resource type ("financial_record", "monthly_summary", ...)
    /// - `action`: change type ("created", "updated", "deleted")
    /// - `id`: resource ID
    /// - `data`: resource data (None for deletions)
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: &str,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let payload = SyncPayload {
            resource: resource.to_string(),
            version,
            action: action.to_string(),
            id: id.to_string(),
            data: data.and_then(|d| serde_json::to_value(d).ok()),
        };
        self.message_bus.publish(BusMessage::sync(&payload));
    }
}
