//! Server bootstrap tests: on-disk database initialization and work-dir
//! layout.

use hq_server::core::{Config, ServerState};
use hq_server::db::models::{RecordCreate, RecordType};
use hq_server::db::repository::FinancialRecordRepository;

#[tokio::test]
async fn initialize_creates_work_dir_and_opens_the_database() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut config = Config::with_overrides(tmp.path().to_string_lossy(), 0);
    config.business_timezone = chrono_tz::UTC;

    let state = ServerState::initialize(&config).await.expect("state init");

    assert!(tmp.path().join("database").exists());
    assert!(tmp.path().join("logs").exists());

    // The on-disk engine serves the same repository layer as the
    // in-memory one
    let records = FinancialRecordRepository::new(state.db.clone(), config.business_timezone);
    let record = records
        .create(
            "f1",
            RecordCreate {
                amount: 12.5,
                record_type: RecordType::Expense,
                date: None,
                category: Some("fuel".into()),
                description: None,
                breakdown: None,
                month: None,
                revenue: None,
                expenses: None,
                logistics_income: None,
            },
            false,
        )
        .await
        .expect("create record");

    assert!(record.id.is_some());
    assert_eq!(records.find_by_franchise("f1").await.unwrap().len(), 1);
}
