//! Notification emitter
//!
//! Workflow transitions (submit, unlock request, rejection) notify the
//! other side of the table. Delivery is strictly fire-and-forget: the
//! transition already committed, so a notification failure is logged and
//! swallowed, never propagated.
//!
//! Resilience: the write is attempted under the primary category first and
//! retried once under the legacy category older inbox readers filter on,
//! then given up silently.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::message::{BusMessage, NotificationPayload};

use crate::db::models::{CATEGORY_FINANCE, CATEGORY_FINANCE_LEGACY, NotificationRequest};
use crate::db::repository::NotificationRepository;
use crate::services::MessageBus;

#[derive(Clone, Debug)]
pub struct NotificationService {
    db: Surreal<Db>,
    bus: Arc<MessageBus>,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>, bus: Arc<MessageBus>) -> Self {
        Self { db, bus }
    }

    /// Emit a notification; never fails, never blocks the caller's outcome
    pub async fn notify(&self, request: NotificationRequest) {
        let repo = NotificationRepository::new(self.db.clone());

        let category = match repo.create(CATEGORY_FINANCE, &request).await {
            Ok(_) => CATEGORY_FINANCE,
            Err(primary_err) => {
                tracing::warn!(
                    target_id = %request.target_id,
                    error = %primary_err,
                    "Primary notification write failed; retrying with legacy category"
                );
                match repo.create(CATEGORY_FINANCE_LEGACY, &request).await {
                    Ok(_) => CATEGORY_FINANCE_LEGACY,
                    Err(fallback_err) => {
                        tracing::warn!(
                            target_id = %request.target_id,
                            error = %fallback_err,
                            "Notification dropped after legacy fallback failed"
                        );
                        return;
                    }
                }
            }
        };

        self.bus.publish(BusMessage::notification(&NotificationPayload {
            category: category.to_string(),
            target_id: request.target_id,
            title: request.title,
            message: request.message,
            priority: match request.priority {
                crate::db::models::NotificationPriority::Low => "low".into(),
                crate::db::models::NotificationPriority::Normal => "normal".into(),
                crate::db::models::NotificationPriority::High => "high".into(),
            },
            metadata: request.metadata,
        }));
    }
}
