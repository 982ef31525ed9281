//! Financial Records API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::{FinancialRecord, RecordCreate, RecordStatus, RecordStatusUpdate};
use crate::db::repository::{FinancialRecordRepository, MonthlySummaryRepository};
use crate::utils::{AppResult, ok, ok_with_message};

const RESOURCE: &str = "financial_record";

fn records_repo(state: &ServerState) -> FinancialRecordRepository {
    FinancialRecordRepository::new(state.db.clone(), state.config.business_timezone)
}

fn summaries_repo(state: &ServerState) -> MonthlySummaryRepository {
    MonthlySummaryRepository::new(state.db.clone(), state.config.business_timezone)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub franchise_id: String,
}

/// GET /api/financial-records?franchise_id= - records of a franchise,
/// newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<FinancialRecord>>>> {
    let records = records_repo(&state)
        .find_by_franchise(&query.franchise_id)
        .await?;
    Ok(ok(records))
}

/// GET /api/financial-records/pending - global review inbox
pub async fn pending(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<FinancialRecord>>>> {
    let records = records_repo(&state).find_pending().await?;
    Ok(ok(records))
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub franchise_id: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(flatten)]
    pub record: RecordCreate,
}

/// POST /api/financial-records - add a transaction
///
/// Aggregation into the monthly summary is the explicit second step here,
/// not a hidden side effect of the insert; a failed aggregation is logged
/// and repaired later by recalculation.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateRecordRequest>,
) -> AppResult<Json<ApiResponse<FinancialRecord>>> {
    payload.record.validate()?;

    let record = records_repo(&state)
        .create(&payload.franchise_id, payload.record, payload.is_draft)
        .await?;

    if record.status != RecordStatus::Draft {
        if let Err(e) = summaries_repo(&state)
            .aggregate_record(&payload.franchise_id, &record)
            .await
        {
            tracing::warn!(
                franchise_id = %payload.franchise_id,
                error = %e,
                "Record created but aggregation failed; run a recalculation"
            );
        }
    }

    let id = record.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&record));

    Ok(ok(record))
}

/// PATCH /api/financial-records/{id}/status - admin approval / rejection
///
/// A draft record that gets approved starts counting: its contribution is
/// folded into the month at that moment.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RecordStatusUpdate>,
) -> AppResult<Json<ApiResponse<FinancialRecord>>> {
    let repo = records_repo(&state);

    let previous_status = repo.find_by_id(&id).await?.map(|r| r.status);
    let record = repo.update_status(&id, payload).await?;

    // Records created pre-approved aggregated on insert, submitted ones on
    // submission; only a draft approved directly starts counting here.
    if previous_status == Some(RecordStatus::Draft) && record.status == RecordStatus::Approved {
        if let Err(e) = summaries_repo(&state)
            .aggregate_record(&record.franchise_id, &record)
            .await
        {
            tracing::warn!(record_id = %id, error = %e, "Aggregation after approval failed");
        }
    }

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&record));
    Ok(ok(record))
}

/// DELETE /api/financial-records/{id}
///
/// Reverses the record's summary contribution before removing it.
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    records_repo(&state)
        .delete(&summaries_repo(&state), &id)
        .await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &id, None);
    Ok(ok(true))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub franchise_id: String,
}

/// POST /api/financial-records/submit - move a franchise's drafts into the
/// review inbox
///
/// Submitted records start counting towards the month, so each one is
/// folded into its summary here.
pub async fn submit_drafts(
    State(state): State<ServerState>,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<Json<ApiResponse<usize>>> {
    let submitted = records_repo(&state)
        .submit_drafts(&payload.franchise_id)
        .await?;

    let summaries = summaries_repo(&state);
    for record in &submitted {
        if let Err(e) = summaries
            .aggregate_record(&payload.franchise_id, record)
            .await
        {
            tracing::warn!(
                franchise_id = %payload.franchise_id,
                error = %e,
                "Submitted record aggregation failed; run a recalculation"
            );
        }
    }

    state.broadcast_sync::<()>(RESOURCE, "updated", &payload.franchise_id, None);
    let count = submitted.len();
    Ok(ok_with_message(count, format!("{count} records submitted")))
}

#[derive(Debug, Deserialize)]
pub struct LockMonthRequest {
    pub franchise_id: String,
    pub month: String,
}

/// POST /api/financial-records/lock-month - fiscal lock of a month's
/// approved records
pub async fn lock_month(
    State(state): State<ServerState>,
    Json(payload): Json<LockMonthRequest>,
) -> AppResult<Json<ApiResponse<usize>>> {
    let locked = records_repo(&state)
        .lock_month(&payload.franchise_id, &payload.month)
        .await?;

    state.broadcast_sync::<()>(RESOURCE, "updated", &payload.franchise_id, None);
    Ok(ok_with_message(locked, format!("{locked} records locked")))
}

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub franchise_id: String,
}

/// POST /api/financial-records/clear - destructive franchise wipe
pub async fn clear(
    State(state): State<ServerState>,
    Json(payload): Json<ClearRequest>,
) -> AppResult<Json<ApiResponse<bool>>> {
    records_repo(&state)
        .clear_franchise_data(&payload.franchise_id)
        .await?;

    state.broadcast_sync::<()>(RESOURCE, "deleted", &payload.franchise_id, None);
    state.broadcast_sync::<()>("monthly_summary", "deleted", &payload.franchise_id, None);
    Ok(ok(true))
}
