//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the numeric range of the error code:
/// - 0xxx: General errors
/// - 2xxx: Permission errors
/// - 4xxx: Financial record errors
/// - 5xxx: Monthly closing errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Permission errors (2xxx)
    Permission,
    /// Financial record errors (4xxx)
    Record,
    /// Monthly closing errors (5xxx)
    Closing,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from a raw error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Record,
            5000..6000 => Self::Closing,
            _ => Self::System,
        }
    }
}

impl From<ErrorCode> for ErrorCategory {
    fn from(code: ErrorCode) -> Self {
        Self::from_code(code as u16)
    }
}
