//! End-to-end closing workflow tests over an in-memory database.
//!
//! Covers the contractual properties of the closing engine: partial-update
//! non-destruction, lock derivation, profit recomputation, month-key
//! validation, aggregation/reversal round trips, recalculation
//! idempotence, the unlock cycle, and the trend window.

use std::time::Duration;

use hq_server::core::{Config, ServerState};
use hq_server::db::models::{
    RecordCreate, RecordReviewStatus, RecordStatus, RecordStatusUpdate, RecordType, SummaryStatus,
    SummaryUpdate,
};
use hq_server::db::repository::{FinancialRecordRepository, MonthlySummaryRepository};
use hq_server::services::RecordFeed;
use hq_server::{FinanceError, db};

const FID: &str = "f1";
const MONTH: &str = "2024-03";
/// 2024-03-15T12:00:00Z
const MID_MARCH: i64 = 1710504000000;

async fn test_state() -> ServerState {
    let db = db::connect_mem().await.expect("in-memory db");
    let mut config = Config::with_overrides("/tmp/hq-test", 0);
    config.business_timezone = chrono_tz::UTC;
    ServerState::with_db(config, db)
}

fn repos(state: &ServerState) -> (FinancialRecordRepository, MonthlySummaryRepository) {
    (
        FinancialRecordRepository::new(state.db.clone(), state.config.business_timezone),
        MonthlySummaryRepository::new(state.db.clone(), state.config.business_timezone),
    )
}

fn income(amount: f64) -> RecordCreate {
    RecordCreate {
        amount,
        record_type: RecordType::Income,
        date: Some(MID_MARCH),
        category: Some("logistics".into()),
        description: None,
        breakdown: None,
        month: None,
        revenue: None,
        expenses: None,
        logistics_income: None,
    }
}

fn expense(amount: f64) -> RecordCreate {
    RecordCreate {
        record_type: RecordType::Expense,
        ..income(amount)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn aggregation_then_reversal_round_trip() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    let record = records.create(FID, income(150.0), false).await.unwrap();
    summaries.aggregate_record(FID, &record).await.unwrap();

    let summary = summaries.get(FID, MONTH).await.unwrap().unwrap();
    assert_eq!(summary.total_income, 150.0);
    assert_eq!(summary.revenue, 150.0);
    assert_eq!(summary.profit, 150.0);

    let id = record.id.as_ref().unwrap().to_string();
    records.delete(&summaries, &id).await.unwrap();

    let summary = summaries.get(FID, MONTH).await.unwrap().unwrap();
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.total_expenses, 0.0);
    assert_eq!(summary.profit, 0.0);
}

#[tokio::test]
async fn breakdown_keys_accumulate_independently() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    let mut first = expense(100.0);
    first.breakdown = Some([("fuel".to_string(), 60.0), ("repairs".to_string(), 40.0)].into());
    let mut second = expense(30.0);
    second.breakdown = Some([("fuel".to_string(), 30.0)].into());

    for create in [first, second] {
        let record = records.create(FID, create, false).await.unwrap();
        summaries.aggregate_record(FID, &record).await.unwrap();
    }

    let summary = summaries.get(FID, MONTH).await.unwrap().unwrap();
    assert_eq!(summary.breakdown["fuel"], 90.0);
    assert_eq!(summary.breakdown["repairs"], 40.0);
    assert_eq!(summary.total_expenses, 130.0);
}

#[tokio::test]
async fn deleting_a_missing_record_is_not_found() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    let err = records
        .delete(&summaries, "financial_record:missing")
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::NotFound { .. }));
}

#[tokio::test]
async fn delete_then_recalculate_agrees_with_never_existed() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    for create in [income(100.0), expense(30.0)] {
        let record = records.create(FID, create, false).await.unwrap();
        summaries.aggregate_record(FID, &record).await.unwrap();
    }
    let extra = records.create(FID, income(50.0), false).await.unwrap();
    summaries.aggregate_record(FID, &extra).await.unwrap();

    let id = extra.id.as_ref().unwrap().to_string();
    records.delete(&summaries, &id).await.unwrap();

    let after_delete = summaries.get(FID, MONTH).await.unwrap().unwrap();
    let recalculated = summaries.recalculate(FID, MONTH).await.unwrap();

    assert_eq!(after_delete.total_income, recalculated.total_income);
    assert_eq!(after_delete.total_expenses, recalculated.total_expenses);
    assert_eq!(recalculated.total_income, 100.0);
    assert_eq!(recalculated.total_expenses, 30.0);
    assert_eq!(recalculated.profit, 70.0);

    // Running the repair twice changes nothing
    let again = summaries.recalculate(FID, MONTH).await.unwrap();
    assert_eq!(again.total_income, recalculated.total_income);
    assert_eq!(again.profit, recalculated.profit);
}

#[tokio::test]
async fn recalculation_skips_draft_and_rejected_records() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    records.create(FID, income(999.0), true).await.unwrap(); // draft
    let rejected = records.create(FID, income(500.0), false).await.unwrap();
    records
        .update_status(
            &rejected.id.as_ref().unwrap().to_string(),
            RecordStatusUpdate {
                status: RecordReviewStatus::Rejected,
                approver_id: None,
                reason: Some("duplicate invoice".into()),
            },
        )
        .await
        .unwrap();
    records.create(FID, income(100.0), false).await.unwrap();

    let summary = summaries.recalculate(FID, MONTH).await.unwrap();
    assert_eq!(summary.total_income, 100.0);
}

#[tokio::test]
async fn submitted_drafts_enter_the_global_inbox_and_count() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    records.create(FID, income(80.0), true).await.unwrap();
    records.create(FID, expense(20.0), true).await.unwrap();
    assert!(records.find_pending().await.unwrap().is_empty());

    let submitted = records.submit_drafts(FID).await.unwrap();
    assert_eq!(submitted.len(), 2);
    for record in &submitted {
        assert_eq!(record.status, RecordStatus::Submitted);
        summaries.aggregate_record(FID, record).await.unwrap();
    }

    assert_eq!(records.find_pending().await.unwrap().len(), 2);

    let summary = summaries.get(FID, MONTH).await.unwrap().unwrap();
    assert_eq!(summary.total_income, 80.0);
    assert_eq!(summary.total_expenses, 20.0);
}

// ---------------------------------------------------------------------------
// Closing workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partial_update_never_zeroes_totals() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                revenue: Some(1000.0),
                expenses: Some(400.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // A status-only payload must merge the stored figures forward
    let summary = summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                status: Some(SummaryStatus::Locked),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.total_income, 1000.0);
    assert_eq!(summary.total_expenses, 400.0);
    assert_eq!(summary.profit, 600.0);
    assert_eq!(summary.status, Some(SummaryStatus::Locked));
    assert_eq!(summary.is_locked, Some(true));
}

#[tokio::test]
async fn profit_is_always_recomputed() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    let summary = summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                total_income: Some(500.0),
                total_expenses: Some(120.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(summary.profit, 380.0);
    // Synonym fields stay in sync
    assert_eq!(summary.revenue, summary.total_income);
    assert_eq!(summary.expenses, summary.total_expenses);
    assert_eq!(summary.gross_income, summary.total_income);
}

#[tokio::test]
async fn month_format_is_validated_strictly() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    for bad in ["2024-13", "24-01"] {
        let err = summaries
            .update_financial_data(FID, bad, SummaryUpdate::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, FinanceError::InvalidFormat { .. }),
            "{bad} should be InvalidFormat, got {err:?}"
        );
    }

    assert!(
        summaries
            .update_financial_data(FID, "2024-01", SummaryUpdate::default())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn empty_franchise_id_is_permission_denied() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    let err = summaries
        .update_financial_data("", MONTH, SummaryUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::PermissionDenied { .. }));
}

#[tokio::test]
async fn lock_flag_follows_status_on_every_update() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    for (status, expected) in [
        (SummaryStatus::Open, false),
        (SummaryStatus::Submitted, true),
        (SummaryStatus::Locked, true),
        (SummaryStatus::UnlockRequested, true),
        (SummaryStatus::Approved, true),
    ] {
        let summary = summaries
            .update_financial_data(
                FID,
                MONTH,
                SummaryUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(summary.is_locked, Some(expected), "status {status:?}");
    }

    // open clears the lock even when the caller claims otherwise
    let summary = summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                status: Some(SummaryStatus::Open),
                is_locked: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.is_locked, Some(false));
}

#[tokio::test]
async fn unlock_round_trip() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                revenue: Some(2000.0),
                status: Some(SummaryStatus::Locked),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let summary = summaries
        .request_unlock(FID, MONTH, "missing invoice")
        .await
        .unwrap();
    assert_eq!(summary.status, Some(SummaryStatus::UnlockRequested));
    assert_eq!(summary.unlock_reason.as_deref(), Some("missing invoice"));
    assert_eq!(summary.is_locked, Some(true));

    let summary = summaries.unlock_month(FID, MONTH).await.unwrap();
    assert_eq!(summary.status, Some(SummaryStatus::Open));
    assert_eq!(summary.is_locked, Some(false));
    // Cleared on approval; the reason survives in the history log
    assert_eq!(summary.unlock_reason, None);

    let actions: Vec<&str> = summary
        .status_history
        .iter()
        .map(|e| e.action.as_str())
        .collect();
    assert_eq!(actions, vec!["requested_by_franchise", "unlocked_by_admin"]);
    assert_eq!(
        summary.status_history[0].reason.as_deref(),
        Some("missing invoice")
    );

    // Totals survived the whole cycle
    assert_eq!(summary.total_income, 2000.0);
}

#[tokio::test]
async fn rejected_unlock_keeps_the_month_locked() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    summaries
        .update_financial_data(
            FID,
            MONTH,
            SummaryUpdate {
                status: Some(SummaryStatus::Locked),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    summaries
        .request_unlock(FID, MONTH, "typo in fuel entry")
        .await
        .unwrap();

    let summary = summaries
        .reject_unlock(FID, MONTH, Some("closing period ended"))
        .await
        .unwrap();

    assert_eq!(summary.status, Some(SummaryStatus::Locked));
    assert_eq!(summary.is_locked, Some(true));
    assert_eq!(summary.unlock_reason, None);
    assert_eq!(
        summary.rejection_reason.as_deref(),
        Some("closing period ended")
    );
    assert_eq!(
        summary.status_history.last().unwrap().action,
        "rejected_by_admin"
    );
}

#[tokio::test]
async fn unlock_on_unknown_month_is_not_found() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    let err = summaries.unlock_month(FID, "2030-01").await.unwrap_err();
    assert!(matches!(err, FinanceError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Fiscal lock / destructive paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lock_month_flags_only_approved_records() {
    let state = test_state().await;
    let (records, _) = repos(&state);

    records.create(FID, income(10.0), false).await.unwrap();
    records.create(FID, income(20.0), false).await.unwrap();
    records.create(FID, income(30.0), true).await.unwrap(); // draft

    let locked = records.lock_month(FID, MONTH).await.unwrap();
    assert_eq!(locked, 2);

    let all = records.find_by_franchise(FID).await.unwrap();
    let locked_count = all
        .iter()
        .filter(|r| r.status == RecordStatus::Locked && r.is_locked)
        .count();
    assert_eq!(locked_count, 2);
    assert_eq!(
        all.iter().filter(|r| r.status == RecordStatus::Draft).count(),
        1
    );
}

#[tokio::test]
async fn reset_month_removes_records_and_summary() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    for create in [income(100.0), expense(40.0)] {
        let record = records.create(FID, create, false).await.unwrap();
        summaries.aggregate_record(FID, &record).await.unwrap();
    }
    assert!(summaries.get(FID, MONTH).await.unwrap().is_some());

    summaries.reset_month(FID, MONTH).await.unwrap();

    assert!(summaries.get(FID, MONTH).await.unwrap().is_none());
    assert!(records.find_by_franchise(FID).await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_franchise_data_leaves_other_franchises_alone() {
    let state = test_state().await;
    let (records, summaries) = repos(&state);

    let mine = records.create(FID, income(10.0), false).await.unwrap();
    summaries.aggregate_record(FID, &mine).await.unwrap();
    let other = records.create("f2", income(99.0), false).await.unwrap();
    summaries.aggregate_record("f2", &other).await.unwrap();

    records.clear_franchise_data(FID).await.unwrap();

    assert!(records.find_by_franchise(FID).await.unwrap().is_empty());
    assert!(summaries.get(FID, MONTH).await.unwrap().is_none());
    assert_eq!(records.find_by_franchise("f2").await.unwrap().len(), 1);
    assert!(summaries.get("f2", MONTH).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn trend_zero_fills_the_whole_window() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    let points = summaries
        .financial_trend(Some(FID), 5, Some("2024-06"))
        .await;

    assert_eq!(points.len(), 6);
    let months: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(
        months,
        vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
    );
    assert!(points.iter().all(|p| p.income == 0.0 && p.profit == 0.0));
}

#[tokio::test]
async fn trend_folds_existing_summaries_into_their_buckets() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    summaries
        .update_financial_data(
            FID,
            "2024-04",
            SummaryUpdate {
                revenue: Some(900.0),
                expenses: Some(300.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let points = summaries
        .financial_trend(Some(FID), 2, Some("2024-05"))
        .await;
    assert_eq!(points.len(), 3);

    let april = points.iter().find(|p| p.month == "2024-04").unwrap();
    assert_eq!(april.income, 900.0);
    assert_eq!(april.revenue, 900.0);
    assert_eq!(april.expenses, 300.0);
    assert_eq!(april.profit, 600.0);
}

#[tokio::test]
async fn trend_with_empty_franchise_filter_is_empty() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    let points = summaries.financial_trend(Some(""), 5, None).await;
    assert!(points.is_empty());
}

#[tokio::test]
async fn wide_trend_windows_use_the_range_path() {
    let state = test_state().await;
    let (_, summaries) = repos(&state);

    summaries
        .update_financial_data(
            FID,
            "2023-09",
            SummaryUpdate {
                revenue: Some(111.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // 13 buckets forces the month-range query instead of the IN query
    let points = summaries
        .financial_trend(Some(FID), 12, Some("2024-06"))
        .await;
    assert_eq!(points.len(), 13);
    let sept = points.iter().find(|p| p.month == "2023-09").unwrap();
    assert_eq!(sept.income, 111.0);
}

// ---------------------------------------------------------------------------
// Record feed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn record_feed_pushes_snapshots_on_mutations() {
    let state = test_state().await;
    let (records, _) = repos(&state);

    let feed = RecordFeed::new(
        state.db.clone(),
        state.message_bus.clone(),
        state.config.business_timezone,
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let guard = feed.subscribe(FID, move |snapshot| {
        let _ = tx.send(snapshot.len());
    });

    // Initial snapshot: empty list
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("initial snapshot")
        .unwrap();
    assert_eq!(first, 0);

    let record = records.create(FID, income(42.0), false).await.unwrap();
    let id = record.id.as_ref().unwrap().to_string();
    state.broadcast_sync("financial_record", "created", &id, Some(&record));

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("snapshot after mutation")
        .unwrap();
    assert_eq!(second, 1);

    drop(guard);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_persist_and_broadcast() {
    use hq_server::db::models::NotificationRequest;
    use hq_server::db::repository::NotificationRepository;
    use shared::message::{EventType, NotificationPayload};

    let state = test_state().await;
    let mut rx = state.message_bus.subscribe();

    state
        .notifications
        .notify(NotificationRequest::new(
            "network_admin",
            "Cierre mensual enviado",
            "La franquicia f1 ha enviado el cierre de 2024-03.",
        ))
        .await;

    let inbox = NotificationRepository::new(state.db.clone())
        .find_by_target("network_admin", 10)
        .await
        .unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].category, "finance_workflow");
    assert!(!inbox[0].read);

    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("bus message")
        .unwrap();
    assert_eq!(msg.event_type, EventType::Notification);
    let payload: NotificationPayload = msg.decode().unwrap();
    assert_eq!(payload.target_id, "network_admin");
}

#[tokio::test]
async fn record_feed_ignores_empty_franchise_id() {
    let state = test_state().await;

    let feed = RecordFeed::new(
        state.db.clone(),
        state.message_bus.clone(),
        state.config.business_timezone,
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<usize>();
    let _guard = feed.subscribe("", move |snapshot| {
        let _ = tx.send(snapshot.len());
    });

    let result = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(result.is_err(), "no snapshot should ever be delivered");
}
