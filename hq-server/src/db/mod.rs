//! Database Module
//!
//! Embedded SurrealDB storage. The binary runs on the RocksDB engine under
//! `<work_dir>/database/hq.db`; tests run on the in-memory engine. Both
//! yield the same `Surreal<Db>` handle, so repositories are engine-agnostic.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "franchise_hq";
const DATABASE: &str = "finance";

/// Open the on-disk database and apply the schema
pub async fn connect_rocksdb(path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open database: {e}")))?;
    init(&db).await?;
    tracing::info!("Database connection established (SurrealDB RocksDB at {path})");
    Ok(db)
}

/// Open an in-memory database and apply the schema (tests)
pub async fn connect_mem() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to open in-memory database: {e}")))?;
    init(&db).await?;
    Ok(db)
}

async fn init(db: &Surreal<Db>) -> Result<(), AppError> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to select namespace: {e}")))?;

    define_schema(db)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to define schema: {e}")))?;

    Ok(())
}

/// Idempotent schema definition, executed on every startup
///
/// Tables stay schemaless (documents carry legacy twin keys the schema
/// must not reject); indexes cover the hot query paths.
async fn define_schema(db: &Surreal<Db>) -> surrealdb::Result<()> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS financial_record SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS financial_record_franchise
            ON TABLE financial_record COLUMNS franchise_id;
        DEFINE INDEX IF NOT EXISTS financial_record_status
            ON TABLE financial_record COLUMNS status;

        DEFINE TABLE IF NOT EXISTS monthly_summary SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS monthly_summary_franchise
            ON TABLE monthly_summary COLUMNS franchise_id;
        DEFINE INDEX IF NOT EXISTS monthly_summary_month
            ON TABLE monthly_summary COLUMNS month;

        DEFINE TABLE IF NOT EXISTS franchise SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS notification SCHEMALESS;
        "#,
    )
    .await?;
    tracing::info!("Database schema applied");
    Ok(())
}
