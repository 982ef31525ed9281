//! Advisories API handlers
//!
//! Tips are derived fresh from the figures in the request on every call;
//! nothing here persists.

use axum::Json;
use serde::{Deserialize, Serialize};

use shared::ApiResponse;

use crate::finance::advisory::{AdvisoryMetrics, BreakEven};
use crate::finance::{AdvisoryTip, compute_advisory, health_check};
use crate::utils::ok;

/// The categories the dashboard renders, in display order
const DEFAULT_FIELDS: [&str; 3] = ["labor", "orders", "fuel"];

#[derive(Debug, Deserialize)]
pub struct ComputeRequest {
    pub metrics: AdvisoryMetrics,
    /// Advisory categories to evaluate; defaults to all of them
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ComputeResponse {
    /// One tip per requested category
    pub tips: Vec<AdvisoryTip>,
    /// The filtered "health check" view: non-safe tips, or one all-clear
    pub health: Vec<AdvisoryTip>,
}

/// POST /api/advisories/compute
pub async fn compute(Json(payload): Json<ComputeRequest>) -> Json<ApiResponse<ComputeResponse>> {
    let fields: Vec<String> = payload
        .fields
        .unwrap_or_else(|| DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect());

    let tips: Vec<AdvisoryTip> = fields
        .iter()
        .map(|field| compute_advisory(field, &payload.metrics))
        .collect();
    let health = health_check(tips.clone());

    ok(ComputeResponse { tips, health })
}

#[derive(Debug, Deserialize)]
pub struct BreakEvenRequest {
    pub revenue: f64,
    pub fixed_costs: f64,
    pub variable_costs: f64,
}

/// POST /api/advisories/break-even
pub async fn break_even(Json(payload): Json<BreakEvenRequest>) -> Json<ApiResponse<BreakEven>> {
    ok(crate::finance::break_even(
        payload.revenue,
        payload.fixed_costs,
        payload.variable_costs,
    ))
}
