//! Database Models

// Serde helpers
pub mod serde_helpers;

// Finance domain
pub mod financial_record;
pub mod monthly_summary;

// Master data
pub mod franchise;

// System
pub mod notification;

// Re-exports
pub use financial_record::{
    FinancialRecord, FinancialRecordId, RecordCreate, RecordReviewStatus, RecordStatus,
    RecordStatusUpdate, RecordType,
};
pub use franchise::{
    Franchise, FranchiseCreate, FranchiseId, RateBand, RateTableUpdate, default_rate_table,
};
pub use monthly_summary::{
    MonthlySummary, MonthlySummaryId, StatusHistoryEntry, SummaryStatus, SummaryUpdate, lock_state,
};
pub use notification::{
    CATEGORY_FINANCE, CATEGORY_FINANCE_LEGACY, Notification, NotificationId, NotificationPriority,
    NotificationRequest,
};
