//! Monthly Summary Repository
//!
//! Owns the two halves of the closing engine:
//! - incremental aggregation of records into the month's summary document
//!   (atomic `+=` increments, one document write per record), plus the
//!   reversal, recalculation and reset paths
//! - the closing workflow transitions (read-merge-write updates, unlock
//!   request/approve/reject) with their status history log
//!
//! All month handling is keyed by `YYYY-MM`; a malformed key is a hard
//! `InvalidFormat` error, never a silent coercion.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use shared::util::now_millis;

use super::{BaseRepository, FinanceError, FinanceResult};
use crate::db::models::serde_helpers::legacy;
use crate::db::models::{
    FinancialRecord, MonthlySummary, RecordStatus, StatusHistoryEntry, SummaryStatus,
    SummaryUpdate, lock_state,
};
use crate::finance::money::{to_decimal, to_f64};
use crate::utils::time::{month_bounds, month_key_of, parse_month_key};

const TABLE: &str = "monthly_summary";

/// Validate a `YYYY-MM` month key
fn validate_month(month: &str) -> FinanceResult<()> {
    if month.is_empty() {
        return Err(FinanceError::validation("month", "Month is required"));
    }
    if parse_month_key(month).is_none() {
        return Err(FinanceError::InvalidFormat {
            field: "month",
            expected: "YYYY-MM",
            received: month.to_string(),
        });
    }
    Ok(())
}

/// First non-zero value wins; zero and absent both fall through.
///
/// Callers pass records in inconsistent shapes (raw `type` + `amount` vs
/// pre-classified figures), and the pre-classified field only counts when
/// it actually carries a value.
fn first_nonzero(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 => v,
        _ => fallback,
    }
}

/// Per-record contribution to a summary
#[derive(Debug, Clone, PartialEq)]
struct Contribution {
    revenue: f64,
    expenses: f64,
    profit: f64,
    logistics_income: f64,
    breakdown: BTreeMap<String, f64>,
}

impl Contribution {
    /// The exact fallback chain of the aggregation pipeline:
    /// `revenue || (type == income ? amount : 0)` and symmetrically for
    /// expenses; `profit || (revenue - expenses)`.
    fn of(record: &FinancialRecord) -> Self {
        let income_amount = match record.record_type {
            crate::db::models::RecordType::Income => record.amount,
            crate::db::models::RecordType::Expense => 0.0,
        };
        let expense_amount = record.amount - income_amount;

        let revenue = first_nonzero(record.revenue, income_amount);
        let expenses = first_nonzero(record.expenses, expense_amount);
        let profit = first_nonzero(record.profit, revenue - expenses);
        let logistics_income = record.logistics_income.unwrap_or(0.0);

        Self {
            revenue,
            expenses,
            profit,
            logistics_income,
            breakdown: record.breakdown.clone().unwrap_or_default(),
        }
    }
}

/// Field-path characters accepted in dynamic breakdown keys
fn breakdown_key_ok(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
}

#[derive(Clone)]
pub struct MonthlySummaryRepository {
    base: BaseRepository,
    tz: Tz,
}

impl MonthlySummaryRepository {
    pub fn new(db: Surreal<Db>, tz: Tz) -> Self {
        Self {
            base: BaseRepository::new(db),
            tz,
        }
    }

    fn thing(franchise_id: &str, month: &str) -> RecordId {
        RecordId::from_table_key(TABLE, MonthlySummary::key(franchise_id, month))
    }

    /// Fetch the summary of one month, `None` when absent or unkeyed
    pub async fn get(
        &self,
        franchise_id: &str,
        month: &str,
    ) -> FinanceResult<Option<MonthlySummary>> {
        if franchise_id.is_empty() || month.is_empty() {
            return Ok(None);
        }
        let summary: Option<MonthlySummary> =
            self.base.db().select(Self::thing(franchise_id, month)).await?;
        Ok(summary)
    }

    /// Closing history of a franchise
    pub async fn fetch_closures(&self, franchise_id: &str) -> FinanceResult<Vec<MonthlySummary>> {
        if franchise_id.is_empty() {
            return Err(FinanceError::PermissionDenied {
                franchise_id: "unknown".into(),
            });
        }

        let mut result = self
            .base
            .db()
            .query("SELECT * FROM type::table($table) WHERE franchise_id = $fid ORDER BY month DESC")
            .bind(("table", TABLE))
            .bind(("fid", franchise_id.to_string()))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        Ok(summaries)
    }

    /// Closures of one calendar year
    pub async fn yearly(&self, franchise_id: &str, year: i32) -> FinanceResult<Vec<MonthlySummary>> {
        let prefix = format!("{year:04}-");
        let all = self.fetch_closures(franchise_id).await?;
        Ok(all
            .into_iter()
            .filter(|s| s.month.starts_with(&prefix))
            .collect())
    }

    /// Summaries whose month key is in the given set (trend windows ≤ 9
    /// months wide)
    pub async fn find_by_months(
        &self,
        franchise_id: Option<&str>,
        months: &[String],
    ) -> FinanceResult<Vec<MonthlySummary>> {
        let mut sql = String::from("SELECT * FROM type::table($table) WHERE month IN $months");
        if franchise_id.is_some() {
            sql.push_str(" AND franchise_id = $fid");
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("table", TABLE))
            .bind(("months", months.to_vec()));
        if let Some(fid) = franchise_id {
            query = query.bind(("fid", fid.to_string()));
        }

        let mut result = query.await?;
        let summaries: Vec<MonthlySummary> = result.take(0)?;
        Ok(summaries)
    }

    /// Summaries inside an inclusive month-key range (wide trend windows;
    /// string comparison is correct because keys are zero-padded)
    pub async fn find_in_range(
        &self,
        franchise_id: Option<&str>,
        first: &str,
        last: &str,
    ) -> FinanceResult<Vec<MonthlySummary>> {
        let mut sql =
            String::from("SELECT * FROM type::table($table) WHERE month >= $first AND month <= $last");
        if franchise_id.is_some() {
            sql.push_str(" AND franchise_id = $fid");
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("table", TABLE))
            .bind(("first", first.to_string()))
            .bind(("last", last.to_string()));
        if let Some(fid) = franchise_id {
            query = query.bind(("fid", fid.to_string()));
        }

        let mut result = query.await?;
        let summaries: Vec<MonthlySummary> = result.take(0)?;
        Ok(summaries)
    }

    /// Multi-month trend series for dashboard charts
    ///
    /// Zero-filled window of `months_back + 1` months anchored at
    /// `base_month` (default: the current month in the business timezone).
    /// Windows of up to 9 months query by key set; wider windows fall back
    /// to a range query to respect typical IN-clause limits.
    ///
    /// This path never breaks a dashboard render: an empty franchise
    /// filter and every internal error produce an empty series.
    pub async fn financial_trend(
        &self,
        franchise_id: Option<&str>,
        months_back: u32,
        base_month: Option<&str>,
    ) -> Vec<crate::finance::TrendPoint> {
        if franchise_id == Some("") {
            return Vec::new();
        }

        let anchor = base_month
            .and_then(parse_month_key)
            .and_then(|(y, m)| chrono::NaiveDate::from_ymd_opt(y, m, 1))
            .unwrap_or_else(|| chrono::Utc::now().with_timezone(&self.tz).date_naive());
        let window = crate::utils::time::month_window(anchor, months_back);

        let summaries = if window.len() <= 9 {
            self.find_by_months(franchise_id, &window).await
        } else {
            // window is never empty: months_back + 1 >= 1
            self.find_in_range(franchise_id, &window[0], &window[window.len() - 1])
                .await
        };

        match summaries {
            Ok(summaries) => crate::finance::fold_trend(&window, &summaries),
            Err(e) => {
                tracing::warn!(error = %e, "Trend query failed; returning empty series");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Closing workflow
    // =========================================================================

    /// Read-merge-write update of a month's financial data
    ///
    /// The single most safety-critical path in the system: when the payload
    /// carries no income/expense figure, the stored values are merged
    /// forward - a partial update must never zero out aggregated history.
    /// Profit is recomputed on every write; the lock flag is derived from
    /// the status transition table.
    pub async fn update_financial_data(
        &self,
        franchise_id: &str,
        month: &str,
        data: SummaryUpdate,
    ) -> FinanceResult<MonthlySummary> {
        if franchise_id.is_empty() {
            // Historically an authorization failure rather than a validation
            // failure; kept for API compatibility.
            return Err(FinanceError::PermissionDenied {
                franchise_id: "unknown".into(),
            });
        }
        validate_month(month)?;

        let existing = self.get(franchise_id, month).await?;
        let (existing_revenue, existing_expenses, existing_status, existing_locked) = existing
            .as_ref()
            .map(|s| (s.total_income, s.total_expenses, s.status, s.is_locked))
            .unwrap_or((0.0, 0.0, None, None));

        let next_revenue = if data.has_income() {
            data.total_income.or(data.revenue).unwrap_or(0.0)
        } else {
            existing_revenue
        };
        let next_expenses = if data.has_expenses() {
            data.total_expenses.or(data.expenses).unwrap_or(0.0)
        } else {
            existing_expenses
        };
        let next_profit = next_revenue - next_expenses;

        let next_status = data.status.or(existing_status).unwrap_or(SummaryStatus::Approved);
        let next_locked = lock_state(next_status)
            .unwrap_or_else(|| data.is_locked.or(existing_locked).unwrap_or(false));

        let now = now_millis();
        let mut doc = serde_json::json!({
            "franchise_id": franchise_id,
            "month": month,
            "status": next_status,
            "total_income": next_revenue,
            "revenue": next_revenue,
            "gross_income": next_revenue,
            "total_expenses": next_expenses,
            "expenses": next_expenses,
            "profit": next_profit,
            "is_locked": next_locked,
            "updated_at": now,
        });
        if let Some(map) = doc.as_object_mut() {
            if let Some(breakdown) = &data.breakdown {
                map.insert("breakdown".into(), serde_json::to_value(breakdown)?);
            }
            if let Some(orders) = data.orders {
                map.insert("orders".into(), orders.into());
            }
            if let Some(hours) = data.total_hours {
                map.insert("total_hours".into(), hours.into());
            }
            if let Some(logistics) = data.logistics_income {
                map.insert("logistics_income".into(), logistics.into());
            }
        }
        let doc = legacy::with_twins(doc);

        let mut result = self
            .base
            .db()
            .query("UPSERT $id MERGE $doc RETURN AFTER")
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("doc", doc))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::unknown("Summary upsert returned no document"))
    }

    /// Franchise-side appeal to re-open a locked month
    pub async fn request_unlock(
        &self,
        franchise_id: &str,
        month: &str,
        reason: &str,
    ) -> FinanceResult<MonthlySummary> {
        validate_month(month)?;

        let status = SummaryStatus::UnlockRequested;
        let entry = StatusHistoryEntry {
            status,
            timestamp: now_millis(),
            reason: Some(reason.to_string()),
            action: "requested_by_franchise".into(),
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                 status = $status, \
                 is_locked = $locked, isLocked = $locked, \
                 unlock_reason = $reason, unlockReason = $reason, \
                 updated_at = $now, updatedAt = $now, \
                 status_history = array::append(status_history ?? [], $entry), \
                 statusHistory = array::append(statusHistory ?? [], $entry) \
                 RETURN AFTER",
            )
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("status", status))
            .bind(("locked", lock_state(status).unwrap_or(true)))
            .bind(("reason", reason.to_string()))
            .bind(("now", now_millis()))
            .bind(("entry", serde_json::to_value(&entry)?))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::not_found(franchise_id, Some(month)))
    }

    /// Admin approval of an unlock request: the month re-opens for edits
    ///
    /// The pending `unlock_reason` is cleared on both exits of
    /// `unlock_requested`; the request's reason survives in the status
    /// history.
    pub async fn unlock_month(
        &self,
        franchise_id: &str,
        month: &str,
    ) -> FinanceResult<MonthlySummary> {
        if franchise_id.is_empty() {
            return Err(FinanceError::validation("franchise_id", "Missing args"));
        }
        validate_month(month)?;

        let status = SummaryStatus::Open;
        let entry = StatusHistoryEntry {
            status,
            timestamp: now_millis(),
            reason: None,
            action: "unlocked_by_admin".into(),
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                 status = $status, \
                 is_locked = $locked, isLocked = $locked, \
                 unlock_reason = NONE, unlockReason = NONE, \
                 updated_at = $now, updatedAt = $now, \
                 status_history = array::append(status_history ?? [], $entry), \
                 statusHistory = array::append(statusHistory ?? [], $entry) \
                 RETURN AFTER",
            )
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("status", status))
            .bind(("locked", lock_state(status).unwrap_or(false)))
            .bind(("now", now_millis()))
            .bind(("entry", serde_json::to_value(&entry)?))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::not_found(franchise_id, Some(month)))
    }

    /// Admin rejection of an unlock request: the month stays locked
    pub async fn reject_unlock(
        &self,
        franchise_id: &str,
        month: &str,
        reason: Option<&str>,
    ) -> FinanceResult<MonthlySummary> {
        validate_month(month)?;

        let status = SummaryStatus::Locked;
        let entry = StatusHistoryEntry {
            status,
            timestamp: now_millis(),
            reason: Some(reason.unwrap_or("No reason provided").to_string()),
            action: "rejected_by_admin".into(),
        };

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                 status = $status, \
                 is_locked = $locked, isLocked = $locked, \
                 unlock_reason = NONE, unlockReason = NONE, \
                 rejection_reason = $reason, rejectionReason = $reason, \
                 updated_at = $now, updatedAt = $now, \
                 status_history = array::append(status_history ?? [], $entry), \
                 statusHistory = array::append(statusHistory ?? [], $entry) \
                 RETURN AFTER",
            )
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("status", status))
            .bind(("locked", lock_state(status).unwrap_or(true)))
            .bind(("reason", reason.map(str::to_string)))
            .bind(("now", now_millis()))
            .bind(("entry", serde_json::to_value(&entry)?))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::not_found(franchise_id, Some(month)))
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Fold one record into its month's summary, atomically
    ///
    /// Every delta lands as a `+=` increment inside a single document
    /// write, so concurrent aggregations never lose updates.
    pub async fn aggregate_record(
        &self,
        franchise_id: &str,
        record: &FinancialRecord,
    ) -> FinanceResult<()> {
        let month = match &record.month {
            Some(m) => m.clone(),
            None => month_key_of(record.date, self.tz),
        };
        let contribution = Contribution::of(record);
        self.apply_contribution(franchise_id, &month, &contribution, 1.0).await
    }

    /// Undo one record's contribution (record deletion path)
    ///
    /// Mirror of [`Self::aggregate_record`] with every delta negated.
    pub async fn reverse_record(
        &self,
        franchise_id: &str,
        month: &str,
        record: &FinancialRecord,
    ) -> FinanceResult<()> {
        let contribution = Contribution::of(record);
        self.apply_contribution(franchise_id, month, &contribution, -1.0).await
    }

    async fn apply_contribution(
        &self,
        franchise_id: &str,
        month: &str,
        contribution: &Contribution,
        sign: f64,
    ) -> FinanceResult<()> {
        validate_month(month)?;

        let mut sql = String::from(
            "UPSERT $id SET \
             franchise_id = $fid, franchiseId = $fid, \
             month = $month, \
             status = $status, \
             updated_at = $now, updatedAt = $now, \
             total_income += $rev, totalIncome += $rev, \
             gross_income += $rev, grossIncome += $rev, \
             revenue += $rev, \
             total_expenses += $exp, totalExpenses += $exp, \
             expenses += $exp, \
             profit += $profit, \
             logistics_income += $logistics, logisticsIncome += $logistics",
        );

        let mut query_binds: Vec<(String, serde_json::Value)> = Vec::new();
        for (i, (key, value)) in contribution.breakdown.iter().enumerate() {
            if !breakdown_key_ok(key) {
                tracing::warn!(key = %key, "Skipping breakdown key with unsupported characters");
                continue;
            }
            if *value <= 0.0 {
                continue;
            }
            sql.push_str(&format!(", breakdown.`{key}` += $b{i}"));
            query_binds.push((format!("b{i}"), serde_json::json!(sign * value)));
        }

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("fid", franchise_id.to_string()))
            .bind(("month", month.to_string()))
            .bind(("status", SummaryStatus::Approved))
            .bind(("now", now_millis()))
            .bind(("rev", sign * contribution.revenue))
            .bind(("exp", sign * contribution.expenses))
            .bind(("profit", sign * contribution.profit))
            .bind(("logistics", sign * contribution.logistics_income));
        for (name, value) in query_binds {
            query = query.bind((name, value));
        }

        query.await?.check()?;
        Ok(())
    }

    /// Authoritative rebuild of one month from its records
    ///
    /// Scans the month's calendar range, skips draft/rejected records, and
    /// overwrites whatever drift incremental aggregation accumulated.
    /// Running it twice in a row yields the same summary.
    pub async fn recalculate(
        &self,
        franchise_id: &str,
        month: &str,
    ) -> FinanceResult<MonthlySummary> {
        validate_month(month)?;
        let (start, end) = month_bounds(month, self.tz)
            .ok_or_else(|| FinanceError::validation("month", "Unresolvable month bounds"))?;

        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM financial_record \
                 WHERE franchise_id = $fid AND date >= $start AND date < $end",
            )
            .bind(("fid", franchise_id.to_string()))
            .bind(("start", start))
            .bind(("end", end))
            .await?;
        let records: Vec<FinancialRecord> = result.take(0)?;

        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut profit = Decimal::ZERO;
        let mut logistics_income = Decimal::ZERO;
        let mut breakdown: BTreeMap<String, Decimal> = BTreeMap::new();

        for record in &records {
            if matches!(record.status, RecordStatus::Draft | RecordStatus::Rejected) {
                continue;
            }
            let c = Contribution::of(record);
            total_income += to_decimal(c.revenue);
            total_expenses += to_decimal(c.expenses);
            profit += to_decimal(c.profit);
            logistics_income += to_decimal(c.logistics_income);
            for (key, value) in &c.breakdown {
                *breakdown.entry(key.clone()).or_default() += to_decimal(*value);
            }
        }

        tracing::info!(
            franchise_id = %franchise_id,
            month = %month,
            records = records.len(),
            income = %total_income,
            expenses = %total_expenses,
            "Recalculated month summary"
        );

        let now = now_millis();
        let income = to_f64(total_income);
        let expenses = to_f64(total_expenses);
        let breakdown_f64: BTreeMap<String, f64> =
            breakdown.into_iter().map(|(k, v)| (k, to_f64(v))).collect();

        let doc = legacy::with_twins(serde_json::json!({
            "franchise_id": franchise_id,
            "month": month,
            "status": SummaryStatus::Approved,
            "total_income": income,
            "revenue": income,
            "gross_income": income,
            "total_expenses": expenses,
            "expenses": expenses,
            "profit": to_f64(profit),
            "logistics_income": to_f64(logistics_income),
            "breakdown": breakdown_f64,
            "updated_at": now,
            "last_force_sync": now,
        }));

        let mut result = self
            .base
            .db()
            .query("UPSERT $id MERGE $doc RETURN AFTER")
            .bind(("id", Self::thing(franchise_id, month)))
            .bind(("doc", doc))
            .await?;

        let summaries: Vec<MonthlySummary> = result.take(0)?;
        summaries
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::unknown("Recalculation returned no document"))
    }

    /// Destructive reset: delete every record of the month AND the summary
    ///
    /// One transaction; irreversible. Callers confirm before invoking.
    pub async fn reset_month(&self, franchise_id: &str, month: &str) -> FinanceResult<()> {
        validate_month(month)?;
        let (start, end) = month_bounds(month, self.tz)
            .ok_or_else(|| FinanceError::validation("month", "Unresolvable month bounds"))?;

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 DELETE financial_record \
                   WHERE franchise_id = $fid AND date >= $start AND date < $end; \
                 DELETE $summary; \
                 COMMIT TRANSACTION;",
            )
            .bind(("fid", franchise_id.to_string()))
            .bind(("start", start))
            .bind(("end", end))
            .bind(("summary", Self::thing(franchise_id, month)))
            .await?
            .check()?;

        tracing::info!(franchise_id = %franchise_id, month = %month, "Month data destroyed");
        Ok(())
    }

    /// Delete a summary document by its raw id (admin cleanup)
    pub async fn delete_document(&self, id: &str) -> FinanceResult<bool> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| FinanceError::validation("id", format!("Invalid ID: {id}")))?;
        let _: Option<MonthlySummary> = self.base.db().delete(record_id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RecordType;

    fn record(record_type: RecordType, amount: f64) -> FinancialRecord {
        FinancialRecord {
            id: None,
            franchise_id: "f1".into(),
            amount,
            date: 1709251200000,
            record_type,
            status: RecordStatus::Approved,
            category: None,
            description: None,
            breakdown: None,
            month: None,
            revenue: None,
            expenses: None,
            profit: None,
            logistics_income: None,
            is_locked: false,
            created_at: None,
            updated_at: None,
            submitted_at: None,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn contribution_classifies_by_type() {
        let c = Contribution::of(&record(RecordType::Income, 150.0));
        assert_eq!(c.revenue, 150.0);
        assert_eq!(c.expenses, 0.0);
        assert_eq!(c.profit, 150.0);

        let c = Contribution::of(&record(RecordType::Expense, 40.0));
        assert_eq!(c.revenue, 0.0);
        assert_eq!(c.expenses, 40.0);
        assert_eq!(c.profit, -40.0);
    }

    #[test]
    fn preclassified_figures_take_precedence() {
        let mut r = record(RecordType::Income, 150.0);
        r.revenue = Some(120.0);
        r.expenses = Some(20.0);
        let c = Contribution::of(&r);
        assert_eq!(c.revenue, 120.0);
        assert_eq!(c.expenses, 20.0);
        assert_eq!(c.profit, 100.0);
    }

    #[test]
    fn zero_preclassified_falls_through_to_amount() {
        let mut r = record(RecordType::Income, 150.0);
        r.revenue = Some(0.0);
        let c = Contribution::of(&r);
        assert_eq!(c.revenue, 150.0);
    }

    #[test]
    fn month_validation_is_strict() {
        assert!(validate_month("2024-03").is_ok());
        assert!(matches!(
            validate_month("2024-13"),
            Err(FinanceError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_month("24-01"),
            Err(FinanceError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_month(""),
            Err(FinanceError::Validation { .. })
        ));
    }

    #[test]
    fn breakdown_keys_reject_path_metacharacters() {
        assert!(breakdown_key_ok("labor"));
        assert!(breakdown_key_ok("fuel costs"));
        assert!(!breakdown_key_ok("a`b"));
        assert!(!breakdown_key_ok("a.b"));
        assert!(!breakdown_key_ok(""));
    }
}
