//! Reports API handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::repository::FranchiseRepository;
use crate::finance::advisory::BreakEven;
use crate::finance::report::report_break_even;
use crate::finance::{ExpenseReport, OrderBuckets, ReportInputs, calculate_expenses, monthly_revenue};
use crate::utils::{AppResult, ok};

#[derive(Debug, Deserialize)]
pub struct ExpenseReportRequest {
    pub revenue: f64,
    pub orders: i64,
    #[serde(default)]
    pub inputs: ReportInputs,
}

#[derive(Debug, Serialize)]
pub struct ExpenseReportResponse {
    pub report: ExpenseReport,
    pub break_even: BreakEven,
}

/// POST /api/reports/expense - full monthly P&L view
pub async fn expense_report(
    Json(payload): Json<ExpenseReportRequest>,
) -> Json<ApiResponse<ExpenseReportResponse>> {
    let report = calculate_expenses(payload.revenue, payload.orders, &payload.inputs);
    let break_even = report_break_even(&report);
    ok(ExpenseReportResponse { report, break_even })
}

#[derive(Debug, Deserialize)]
pub struct RevenueRequest {
    pub franchise_id: String,
    /// Explicit stored revenue; wins when present and non-zero
    pub stored_revenue: Option<f64>,
    #[serde(default)]
    pub buckets: OrderBuckets,
}

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub revenue: f64,
    pub total_orders: i64,
}

/// POST /api/reports/revenue - derive monthly revenue through the
/// franchise's logistics rate table
pub async fn derive_revenue(
    State(state): State<ServerState>,
    Json(payload): Json<RevenueRequest>,
) -> AppResult<Json<ApiResponse<RevenueResponse>>> {
    let table = FranchiseRepository::new(state.db.clone())
        .rate_table(&payload.franchise_id)
        .await?;

    let revenue = monthly_revenue(payload.stored_revenue, &payload.buckets, &table);
    Ok(ok(RevenueResponse {
        revenue,
        total_orders: payload.buckets.total_orders(),
    }))
}
