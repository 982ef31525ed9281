//! Health check handler

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use shared::ApiResponse;
use shared::util::now_millis;

use crate::core::ServerState;
use crate::utils::ok;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
    pub timestamp: i64,
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> Json<ApiResponse<HealthStatus>> {
    ok(HealthStatus {
        status: "ok",
        environment: state.config.environment.clone(),
        timestamp: now_millis(),
    })
}
