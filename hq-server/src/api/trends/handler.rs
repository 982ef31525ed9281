//! Trends API handler

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::repository::MonthlySummaryRepository;
use crate::finance::TrendPoint;
use crate::utils::ok;

fn default_months_back() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Absent = network-wide series across every franchise
    pub franchise_id: Option<String>,
    #[serde(default = "default_months_back")]
    pub months_back: u32,
    /// Anchor month (`YYYY-MM`), default: current month
    pub base_month: Option<String>,
}

/// GET /api/trends - zero-filled monthly series for charts
///
/// This endpoint never fails: bad input or storage trouble produces an
/// empty series, keeping dashboards rendering.
pub async fn trend(
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> Json<ApiResponse<Vec<TrendPoint>>> {
    let repo = MonthlySummaryRepository::new(state.db.clone(), state.config.business_timezone);

    let points = repo
        .financial_trend(
            query.franchise_id.as_deref(),
            query.months_back,
            query.base_month.as_deref(),
        )
        .await;

    ok(points)
}
