//! Financial Record Repository
//!
//! CRUD over individual income/expense transactions. Creation does NOT
//! aggregate into the month's summary - aggregation is a separate explicit
//! step the caller triggers, which keeps record mutation and summary
//! mutation independently testable.

use chrono_tz::Tz;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use shared::util::now_millis;

use super::monthly_summary::MonthlySummaryRepository;
use super::{BaseRepository, FinanceError, FinanceResult};
use crate::db::models::serde_helpers::legacy;
use crate::db::models::{
    FinancialRecord, RecordCreate, RecordReviewStatus, RecordStatus, RecordStatusUpdate,
};
use crate::utils::time::{month_bounds, month_key_of};

const TABLE: &str = "financial_record";

#[derive(Clone)]
pub struct FinancialRecordRepository {
    base: BaseRepository,
    tz: Tz,
}

impl FinancialRecordRepository {
    pub fn new(db: Surreal<Db>, tz: Tz) -> Self {
        Self {
            base: BaseRepository::new(db),
            tz,
        }
    }

    fn parse_id(id: &str) -> FinanceResult<RecordId> {
        id.parse()
            .map_err(|_| FinanceError::validation("id", format!("Invalid ID: {id}")))
    }

    /// Create a transaction (expense or income)
    ///
    /// Draft records wait for an explicit submission; everything else lands
    /// pre-approved, matching how franchise managers enter their own books.
    pub async fn create(
        &self,
        franchise_id: &str,
        data: RecordCreate,
        is_draft: bool,
    ) -> FinanceResult<FinancialRecord> {
        if franchise_id.is_empty() {
            return Err(FinanceError::validation(
                "franchise_id",
                "Franchise ID required",
            ));
        }

        let now = now_millis();
        let record = FinancialRecord {
            id: None,
            franchise_id: franchise_id.to_string(),
            amount: data.amount,
            date: data.date.unwrap_or(now),
            record_type: data.record_type,
            status: if is_draft {
                RecordStatus::Draft
            } else {
                RecordStatus::Approved
            },
            category: data.category,
            description: data.description,
            breakdown: data.breakdown,
            month: data.month,
            revenue: data.revenue,
            expenses: data.expenses,
            profit: None,
            logistics_income: data.logistics_income,
            is_locked: false,
            created_at: Some(now),
            updated_at: Some(now),
            submitted_at: (!is_draft).then_some(now),
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
        };

        let mut doc = serde_json::to_value(&record)?;
        if let Some(map) = doc.as_object_mut() {
            map.remove("id");
        }
        let doc = legacy::with_twins(doc);

        let created: Option<FinancialRecord> = self.base.db().create(TABLE).content(doc).await?;
        created.ok_or_else(|| FinanceError::unknown("Record create returned no document"))
    }

    pub async fn find_by_id(&self, id: &str) -> FinanceResult<Option<FinancialRecord>> {
        let record: Option<FinancialRecord> = self.base.db().select(Self::parse_id(id)?).await?;
        Ok(record)
    }

    /// All records of a franchise, newest first
    pub async fn find_by_franchise(&self, franchise_id: &str) -> FinanceResult<Vec<FinancialRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE franchise_id = $fid ORDER BY date DESC",
            )
            .bind(("table", TABLE))
            .bind(("fid", franchise_id.to_string()))
            .await?;
        let records: Vec<FinancialRecord> = result.take(0)?;
        Ok(records)
    }

    /// Global review inbox: submitted records across every franchise,
    /// oldest first
    pub async fn find_pending(&self) -> FinanceResult<Vec<FinancialRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM type::table($table) \
                 WHERE status = $status ORDER BY date ASC",
            )
            .bind(("table", TABLE))
            .bind(("status", RecordStatus::Submitted))
            .await?;
        let records: Vec<FinancialRecord> = result.take(0)?;
        Ok(records)
    }

    /// Submit a franchise's draft records for administrative review
    ///
    /// Returns the records moved to `submitted`. Submitted records count
    /// towards the month (recalculation only skips drafts and rejections),
    /// so the caller aggregates each returned record.
    pub async fn submit_drafts(&self, franchise_id: &str) -> FinanceResult<Vec<FinancialRecord>> {
        if franchise_id.is_empty() {
            return Err(FinanceError::validation(
                "franchise_id",
                "Franchise ID required",
            ));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::table($table) SET \
                 status = $submitted_status, \
                 submitted_at = $now, submittedAt = $now, \
                 updated_at = $now, updatedAt = $now \
                 WHERE franchise_id = $fid AND status = $draft_status \
                 RETURN AFTER",
            )
            .bind(("table", TABLE))
            .bind(("submitted_status", RecordStatus::Submitted))
            .bind(("draft_status", RecordStatus::Draft))
            .bind(("now", now))
            .bind(("fid", franchise_id.to_string()))
            .await?;

        let submitted: Vec<FinancialRecord> = result.take(0)?;
        Ok(submitted)
    }

    /// Admin approval / rejection of a record
    ///
    /// Approval stamps the approver; rejection stores the reason when one
    /// is given. Reason presence is a UI-layer concern, not enforced here.
    pub async fn update_status(
        &self,
        id: &str,
        update: RecordStatusUpdate,
    ) -> FinanceResult<FinancialRecord> {
        let record_id = Self::parse_id(id)?;

        let now = now_millis();
        let mut doc = serde_json::json!({
            "status": RecordStatus::from(update.status),
            "updated_at": now,
        });
        if let Some(map) = doc.as_object_mut() {
            match update.status {
                RecordReviewStatus::Approved => {
                    map.insert("approved_at".into(), now.into());
                    if let Some(approver) = &update.approver_id {
                        map.insert("approved_by".into(), approver.clone().into());
                    }
                }
                RecordReviewStatus::Rejected => {
                    if let Some(reason) = &update.reason {
                        map.insert("rejection_reason".into(), reason.clone().into());
                    }
                }
            }
        }
        let doc = legacy::with_twins(doc);

        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $doc RETURN AFTER")
            .bind(("id", record_id))
            .bind(("doc", doc))
            .await?;

        let records: Vec<FinancialRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| FinanceError::validation("id", format!("Record not found: {id}")))
    }

    /// Delete a record, reversing its summary contribution first
    ///
    /// Ordering is a correctness requirement: reversing after the delete
    /// would be unrecoverable if the reversal failed. A failed reversal is
    /// logged and the delete proceeds - losing summary accuracy is
    /// preferable to blocking the delete (the recalculation path repairs
    /// the drift).
    pub async fn delete(
        &self,
        summaries: &MonthlySummaryRepository,
        id: &str,
    ) -> FinanceResult<()> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| FinanceError::not_found(format!("record {id}"), None))?;

        // Draft and rejected records never contributed to the summary
        // (aggregation and recalculation both skip them), so there is
        // nothing to reverse.
        let contributed = !record.franchise_id.is_empty()
            && !matches!(record.status, RecordStatus::Draft | RecordStatus::Rejected);

        if contributed {
            let month = record
                .month
                .clone()
                .unwrap_or_else(|| month_key_of(record.date, self.tz));

            if let Err(e) = summaries
                .reverse_record(&record.franchise_id, &month, &record)
                .await
            {
                tracing::warn!(
                    record_id = %id,
                    month = %month,
                    error = %e,
                    "Summary reversal failed; deleting record anyway"
                );
            }
        }

        let _: Option<FinancialRecord> = self.base.db().delete(Self::parse_id(id)?).await?;
        Ok(())
    }

    /// Fiscal lock: flag every approved record of the month as locked
    ///
    /// Returns the number of locked records.
    pub async fn lock_month(&self, franchise_id: &str, month: &str) -> FinanceResult<usize> {
        let (start, end) = month_bounds(month, self.tz).ok_or(FinanceError::InvalidFormat {
            field: "month",
            expected: "YYYY-MM",
            received: month.to_string(),
        })?;

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE type::table($table) SET \
                 status = $locked_status, \
                 is_locked = true, isLocked = true, \
                 updated_at = $now, updatedAt = $now \
                 WHERE franchise_id = $fid \
                   AND date >= $start AND date < $end \
                   AND status = $approved_status \
                 RETURN AFTER",
            )
            .bind(("table", TABLE))
            .bind(("locked_status", RecordStatus::Locked))
            .bind(("approved_status", RecordStatus::Approved))
            .bind(("now", now_millis()))
            .bind(("fid", franchise_id.to_string()))
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let locked: Vec<FinancialRecord> = result.take(0)?;
        Ok(locked.len())
    }

    /// Destructive: remove every record and summary of a franchise
    ///
    /// One transaction; used by the administrative franchise wipe.
    pub async fn clear_franchise_data(&self, franchise_id: &str) -> FinanceResult<()> {
        if franchise_id.is_empty() {
            return Err(FinanceError::validation(
                "franchise_id",
                "Franchise ID required",
            ));
        }

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 DELETE financial_record WHERE franchise_id = $fid; \
                 DELETE monthly_summary WHERE franchise_id = $fid; \
                 COMMIT TRANSACTION;",
            )
            .bind(("fid", franchise_id.to_string()))
            .await?
            .check()?;

        tracing::info!(franchise_id = %franchise_id, "Cleared all financial data");
        Ok(())
    }
}
