//! Franchises API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::{Franchise, FranchiseCreate, RateTableUpdate};
use crate::db::repository::FranchiseRepository;
use crate::utils::{AppError, AppResult, ok};

const RESOURCE: &str = "franchise";

fn repo(state: &ServerState) -> FranchiseRepository {
    FranchiseRepository::new(state.db.clone())
}

/// GET /api/franchises
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Franchise>>>> {
    let franchises = repo(&state).find_all().await?;
    Ok(ok(franchises))
}

/// GET /api/franchises/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Franchise>>> {
    let franchise = repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Franchise {id} not found")))?;
    Ok(ok(franchise))
}

/// POST /api/franchises
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FranchiseCreate>,
) -> AppResult<Json<ApiResponse<Franchise>>> {
    payload.validate()?;

    let franchise = repo(&state).create(payload).await?;

    let id = franchise.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    state.broadcast_sync(RESOURCE, "created", &id, Some(&franchise));
    Ok(ok(franchise))
}

/// PUT /api/franchises/{id}/rates - replace the logistics rate table
pub async fn update_rates(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RateTableUpdate>,
) -> AppResult<Json<ApiResponse<Franchise>>> {
    let franchise = repo(&state).update_rate_table(&id, payload.rate_table).await?;

    state.broadcast_sync(RESOURCE, "updated", &id, Some(&franchise));
    Ok(ok(franchise))
}
