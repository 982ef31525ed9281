//! Monthly Summaries API handlers
//!
//! The closing workflow lives here: franchise managers edit and submit
//! their month, admins lock, and the unlock request/approve/reject cycle
//! runs in between. Workflow transitions emit fire-and-forget
//! notifications to the other side; a notification failure never rolls
//! back a transition.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::{
    MonthlySummary, NotificationPriority, NotificationRequest, SummaryStatus, SummaryUpdate,
};
use crate::db::repository::MonthlySummaryRepository;
use crate::utils::{AppResult, ok};

const RESOURCE: &str = "monthly_summary";

/// Inbox target for administrative review notifications
const ADMIN_TARGET: &str = "network_admin";

fn repo(state: &ServerState) -> MonthlySummaryRepository {
    MonthlySummaryRepository::new(state.db.clone(), state.config.business_timezone)
}

/// GET /api/summaries/{franchise_id} - closing history
pub async fn closures(
    State(state): State<ServerState>,
    Path(franchise_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<MonthlySummary>>>> {
    let summaries = repo(&state).fetch_closures(&franchise_id).await?;
    Ok(ok(summaries))
}

/// GET /api/summaries/{franchise_id}/year/{year}
pub async fn yearly(
    State(state): State<ServerState>,
    Path((franchise_id, year)): Path<(String, i32)>,
) -> AppResult<Json<ApiResponse<Vec<MonthlySummary>>>> {
    let summaries = repo(&state).yearly(&franchise_id, year).await?;
    Ok(ok(summaries))
}

/// GET /api/summaries/{franchise_id}/{month}
pub async fn get_month(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<Option<MonthlySummary>>>> {
    let summary = repo(&state).get(&franchise_id, &month).await?;
    Ok(ok(summary))
}

/// PUT /api/summaries/{franchise_id}/{month} - save the closing screen
///
/// A submission (status moving to `submitted`) notifies the network admin
/// inbox for review.
pub async fn update_month(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
    Json(payload): Json<SummaryUpdate>,
) -> AppResult<Json<ApiResponse<MonthlySummary>>> {
    let submitted = payload.status == Some(SummaryStatus::Submitted);

    let summary = repo(&state)
        .update_financial_data(&franchise_id, &month, payload)
        .await?;

    if submitted {
        state
            .notifications
            .notify(
                NotificationRequest::new(
                    ADMIN_TARGET,
                    "Cierre mensual enviado",
                    format!("La franquicia {franchise_id} ha enviado el cierre de {month}."),
                )
                .with_metadata(serde_json::json!({
                    "franchise_id": franchise_id,
                    "month": month,
                })),
            )
            .await;
    }

    state.broadcast_sync(RESOURCE, "updated", &MonthlySummary::key(&franchise_id, &month), Some(&summary));
    Ok(ok(summary))
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequestBody {
    pub reason: String,
}

/// POST /api/summaries/{franchise_id}/{month}/request-unlock
pub async fn request_unlock(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
    Json(payload): Json<UnlockRequestBody>,
) -> AppResult<Json<ApiResponse<MonthlySummary>>> {
    let summary = repo(&state)
        .request_unlock(&franchise_id, &month, &payload.reason)
        .await?;

    state
        .notifications
        .notify(
            NotificationRequest::new(
                ADMIN_TARGET,
                "Solicitud de desbloqueo",
                format!(
                    "La franquicia {franchise_id} pide reabrir {month}: {}",
                    payload.reason
                ),
            )
            .with_priority(NotificationPriority::High)
            .with_metadata(serde_json::json!({
                "franchise_id": franchise_id,
                "month": month,
            })),
        )
        .await;

    state.broadcast_sync(RESOURCE, "updated", &MonthlySummary::key(&franchise_id, &month), Some(&summary));
    Ok(ok(summary))
}

/// POST /api/summaries/{franchise_id}/{month}/unlock - admin approval
pub async fn unlock(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<MonthlySummary>>> {
    let summary = repo(&state).unlock_month(&franchise_id, &month).await?;

    state
        .notifications
        .notify(NotificationRequest::new(
            &franchise_id,
            "Mes desbloqueado",
            format!("El mes {month} vuelve a estar abierto para ediciones."),
        ))
        .await;

    state.broadcast_sync(RESOURCE, "updated", &MonthlySummary::key(&franchise_id, &month), Some(&summary));
    Ok(ok(summary))
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectUnlockBody {
    pub reason: Option<String>,
}

/// POST /api/summaries/{franchise_id}/{month}/reject-unlock - admin denial
pub async fn reject_unlock(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
    Json(payload): Json<RejectUnlockBody>,
) -> AppResult<Json<ApiResponse<MonthlySummary>>> {
    let summary = repo(&state)
        .reject_unlock(&franchise_id, &month, payload.reason.as_deref())
        .await?;

    state
        .notifications
        .notify(NotificationRequest::new(
            &franchise_id,
            "Desbloqueo rechazado",
            format!(
                "La solicitud de reapertura de {month} fue rechazada: {}",
                payload.reason.as_deref().unwrap_or("sin motivo indicado")
            ),
        ))
        .await;

    state.broadcast_sync(RESOURCE, "updated", &MonthlySummary::key(&franchise_id, &month), Some(&summary));
    Ok(ok(summary))
}

/// POST /api/summaries/{franchise_id}/{month}/recalculate - authoritative
/// rebuild from the month's records
pub async fn recalculate(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<MonthlySummary>>> {
    let summary = repo(&state).recalculate(&franchise_id, &month).await?;

    state.broadcast_sync(RESOURCE, "updated", &MonthlySummary::key(&franchise_id, &month), Some(&summary));
    Ok(ok(summary))
}

/// DELETE /api/summaries/document/{id} - drop one summary document by its
/// raw id (admin cleanup of orphaned aggregates)
pub async fn delete_document(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let deleted = repo(&state).delete_document(&id).await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &id, None);
    Ok(ok(deleted))
}

/// DELETE /api/summaries/{franchise_id}/{month} - destructive month reset
///
/// Deletes every record of the month AND the summary document. The UI
/// double-confirms before calling this.
pub async fn reset_month(
    State(state): State<ServerState>,
    Path((franchise_id, month)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<bool>>> {
    repo(&state).reset_month(&franchise_id, &month).await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &MonthlySummary::key(&franchise_id, &month), None);
    state.broadcast_sync::<()>("financial_record", "deleted", &franchise_id, None);
    Ok(ok(true))
}
