//! Monthly Summary Model
//!
//! One mutable aggregate per (franchise, month) pair. The document id is
//! deterministic: `{franchise_id}_{month}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

pub type MonthlySummaryId = RecordId;

/// Closing workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    Draft,
    Open,
    Submitted,
    Locked,
    UnlockRequested,
    Approved,
    Rejected,
}

/// The status → is_locked derivation table
///
/// `None` means the transition leaves the previous lock value unchanged.
/// This is the single source of truth; every call site that touches the
/// lock flag goes through here.
pub fn lock_state(status: SummaryStatus) -> Option<bool> {
    match status {
        SummaryStatus::Open => Some(false),
        SummaryStatus::Submitted
        | SummaryStatus::Locked
        | SummaryStatus::UnlockRequested
        | SummaryStatus::Approved => Some(true),
        SummaryStatus::Draft | SummaryStatus::Rejected => None,
    }
}

/// Append-only status change log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: SummaryStatus,
    /// Unix millis
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Actor tag: "requested_by_franchise", "unlocked_by_admin", ...
    pub action: String,
}

/// Monthly summary entity
///
/// `total_income`/`revenue`/`gross_income` and `total_expenses`/`expenses`
/// are synonym pairs kept in sync on every write; `profit` is always
/// recomputed from them and never trusted from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MonthlySummaryId>,

    #[serde(default)]
    pub franchise_id: String,

    /// `YYYY-MM`
    #[serde(default)]
    pub month: String,

    // === Aggregates ===
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub gross_income: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub expenses: f64,
    #[serde(default)]
    pub profit: f64,

    /// Category → amount, each entry independently additive
    #[serde(default)]
    pub breakdown: BTreeMap<String, f64>,

    // === Closing workflow ===
    /// Absent on documents created purely by aggregation before the first
    /// explicit save
    pub status: Option<SummaryStatus>,
    pub is_locked: Option<bool>,
    pub unlock_reason: Option<String>,
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,

    // === Operational figures ===
    #[serde(default)]
    pub orders: i64,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub logistics_income: f64,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub last_force_sync: Option<i64>,
}

impl MonthlySummary {
    /// Deterministic document key
    pub fn key(franchise_id: &str, month: &str) -> String {
        format!("{franchise_id}_{month}")
    }

    /// Effective lock flag (defaults to false when never set)
    pub fn locked(&self) -> bool {
        self.is_locked.unwrap_or(false)
    }
}

/// Partial update payload for the monthly closing screen
///
/// Absent fields merge the stored values forward; they are never replaced
/// by defaults. See the repository's read-merge-write path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryUpdate {
    pub total_income: Option<f64>,
    pub revenue: Option<f64>,
    pub total_expenses: Option<f64>,
    pub expenses: Option<f64>,
    pub status: Option<SummaryStatus>,
    pub is_locked: Option<bool>,
    pub breakdown: Option<BTreeMap<String, f64>>,
    pub orders: Option<i64>,
    pub total_hours: Option<f64>,
    pub logistics_income: Option<f64>,
}

impl SummaryUpdate {
    /// Whether the payload carries any income figure
    pub fn has_income(&self) -> bool {
        self.total_income.is_some() || self.revenue.is_some()
    }

    /// Whether the payload carries any expense figure
    pub fn has_expenses(&self) -> bool {
        self.total_expenses.is_some() || self.expenses.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_state_follows_the_transition_table() {
        assert_eq!(lock_state(SummaryStatus::Open), Some(false));
        for status in [
            SummaryStatus::Submitted,
            SummaryStatus::Locked,
            SummaryStatus::UnlockRequested,
            SummaryStatus::Approved,
        ] {
            assert_eq!(lock_state(status), Some(true), "{status:?} must lock");
        }
        // draft/rejected leave the previous value unchanged
        assert_eq!(lock_state(SummaryStatus::Draft), None);
        assert_eq!(lock_state(SummaryStatus::Rejected), None);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let s = serde_json::to_string(&SummaryStatus::UnlockRequested).unwrap();
        assert_eq!(s, "\"unlock_requested\"");
    }

    #[test]
    fn key_is_deterministic() {
        assert_eq!(MonthlySummary::key("f1", "2024-03"), "f1_2024-03");
    }

    #[test]
    fn partial_payload_reports_present_fields() {
        let update = SummaryUpdate {
            revenue: Some(100.0),
            ..Default::default()
        };
        assert!(update.has_income());
        assert!(!update.has_expenses());
    }
}
