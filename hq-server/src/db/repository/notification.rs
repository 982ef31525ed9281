//! Notification Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::util::now_millis;

use super::{BaseRepository, FinanceError, FinanceResult};
use crate::db::models::{Notification, NotificationRequest};

const TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a notification under the given category
    pub async fn create(
        &self,
        category: &str,
        request: &NotificationRequest,
    ) -> FinanceResult<Notification> {
        let notification = Notification {
            id: None,
            category: category.to_string(),
            target_id: request.target_id.clone(),
            title: request.title.clone(),
            message: request.message.clone(),
            priority: request.priority,
            metadata: request.metadata.clone(),
            read: false,
            created_at: Some(now_millis()),
        };

        let mut doc = serde_json::to_value(&notification)?;
        if let Some(map) = doc.as_object_mut() {
            map.remove("id");
        }

        let created: Option<Notification> = self.base.db().create(TABLE).content(doc).await?;
        created.ok_or_else(|| FinanceError::unknown("Notification create returned no document"))
    }

    /// Unread-first inbox listing for a target
    pub async fn find_by_target(
        &self,
        target_id: &str,
        limit: usize,
    ) -> FinanceResult<Vec<Notification>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE target_id = $target \
                 ORDER BY `read` ASC, created_at DESC \
                 LIMIT $limit",
            )
            .bind(("table", TABLE))
            .bind(("target", target_id.to_string()))
            .bind(("limit", limit))
            .await?;
        let notifications: Vec<Notification> = result.take(0)?;
        Ok(notifications)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, id: &str) -> FinanceResult<()> {
        let record_id: surrealdb::RecordId = id
            .parse()
            .map_err(|_| FinanceError::validation("id", format!("Invalid ID: {id}")))?;

        self.base
            .db()
            .query("UPDATE $id SET `read` = true")
            .bind(("id", record_id))
            .await?
            .check()?;
        Ok(())
    }
}
