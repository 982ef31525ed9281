//! Repository Module
//!
//! CRUD and aggregation operations over the SurrealDB tables. Every
//! store-mutating operation returns a [`FinanceResult`] so callers must
//! branch on the outcome; read helpers with a safe empty default swallow
//! errors at the service layer instead.

pub mod financial_record;
pub mod franchise;
pub mod monthly_summary;
pub mod notification;

// Re-exports
pub use financial_record::FinancialRecordRepository;
pub use franchise::FranchiseRepository;
pub use monthly_summary::MonthlySummaryRepository;
pub use notification::NotificationRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Finance domain error taxonomy
///
/// Discriminated by variant so callers and the HTTP layer can branch on the
/// failure class without string matching.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Permission denied for franchise '{franchise_id}'")]
    PermissionDenied { franchise_id: String },

    #[error("Validation failed on '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("Not found: franchise '{franchise_id}', month '{}'", .month.as_deref().unwrap_or("-"))]
    NotFound {
        franchise_id: String,
        month: Option<String>,
    },

    #[error("Storage backend error: {cause}")]
    Network { cause: String },

    #[error("Invalid format on '{field}': expected {expected}, received '{received}'")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
        received: String,
    },

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl FinanceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(franchise_id: impl Into<String>, month: Option<&str>) -> Self {
        Self::NotFound {
            franchise_id: franchise_id.into(),
            month: month.map(str::to_string),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}

impl From<surrealdb::Error> for FinanceError {
    fn from(err: surrealdb::Error) -> Self {
        FinanceError::Network {
            cause: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::Unknown {
            message: format!("Serialization error: {err}"),
        }
    }
}

/// Result type for repository operations
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
