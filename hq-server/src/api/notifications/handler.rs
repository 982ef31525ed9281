//! Notifications API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use crate::utils::{AppResult, ok};

fn default_limit() -> usize {
    50
}

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// GET /api/notifications/{target_id} - unread-first inbox
pub async fn inbox(
    State(state): State<ServerState>,
    Path(target_id): Path<String>,
    Query(query): Query<InboxQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = NotificationRepository::new(state.db.clone())
        .find_by_target(&target_id, query.limit)
        .await?;
    Ok(ok(notifications))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    NotificationRepository::new(state.db.clone())
        .mark_read(&id)
        .await?;
    Ok(ok(true))
}
