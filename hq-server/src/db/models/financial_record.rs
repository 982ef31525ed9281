//! Financial Record Model
//!
//! One income or expense transaction contributing to a monthly summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use super::serde_helpers;

pub type FinancialRecordId = RecordId;

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Income,
    Expense,
}

/// Record lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    Locked,
    Pending,
}

/// Financial record entity
///
/// Callers pass record data in inconsistent shapes: either a raw
/// `type` + `amount` pair, or pre-classified `revenue`/`expenses` figures.
/// Both are kept on the document so aggregation and reversal see the same
/// shape the writer produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FinancialRecordId>,

    pub franchise_id: String,

    /// Transaction amount, always coerced to a number on write
    #[serde(default)]
    pub amount: f64,

    /// Transaction date (unix millis)
    #[serde(default)]
    pub date: i64,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    pub status: RecordStatus,

    pub category: Option<String>,
    pub description: Option<String>,

    /// Optional sub-category amounts, each independently additive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,

    /// Explicit month override (`YYYY-MM`); derived from `date` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    // Pre-classified figures (optional; take precedence over type/amount
    // during aggregation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistics_income: Option<f64>,

    /// Redundant with `status`, persisted separately for legacy readers
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_locked: bool,

    // Audit timestamps (unix millis)
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub submitted_at: Option<i64>,
    pub approved_at: Option<i64>,

    pub approved_by: Option<String>,
    pub rejection_reason: Option<String>,
}

/// Create-record input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordCreate {
    #[validate(range(min = 0.0))]
    pub amount: f64,

    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Transaction date (unix millis); defaults to now
    pub date: Option<i64>,

    pub category: Option<String>,
    pub description: Option<String>,

    #[serde(default)]
    pub breakdown: Option<BTreeMap<String, f64>>,

    /// Explicit month override (`YYYY-MM`)
    pub month: Option<String>,

    pub revenue: Option<f64>,
    pub expenses: Option<f64>,
    pub logistics_income: Option<f64>,
}

/// Admin approval / rejection input
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStatusUpdate {
    pub status: RecordReviewStatus,
    pub approver_id: Option<String>,
    pub reason: Option<String>,
}

/// The two statuses an admin review can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordReviewStatus {
    Approved,
    Rejected,
}

impl From<RecordReviewStatus> for RecordStatus {
    fn from(review: RecordReviewStatus) -> Self {
        match review {
            RecordReviewStatus::Approved => RecordStatus::Approved,
            RecordReviewStatus::Rejected => RecordStatus::Rejected,
        }
    }
}
