//! Unified error codes for the Franchise HQ back-office
//!
//! Error codes are shared between the server and frontend clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Financial record errors
//! - 5xxx: Monthly closing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (e.g. malformed month key)
    InvalidFormat = 6,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Financial records ====================
    /// Record is locked and cannot be modified
    RecordLocked = 4001,
    /// Record status transition not allowed
    InvalidRecordStatus = 4002,

    // ==================== 5xxx: Monthly closing ====================
    /// Month is locked pending administrative review
    MonthLocked = 5001,
    /// An unlock request is already pending for this month
    UnlockPending = 5002,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9001,
    /// Network / storage backend error
    NetworkError = 9002,
    /// Internal server error
    InternalError = 9003,
}

/// Error returned when converting an unknown u16 into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::InvalidFormat),
            2001 => Ok(Self::PermissionDenied),
            4001 => Ok(Self::RecordLocked),
            4002 => Ok(Self::InvalidRecordStatus),
            5001 => Ok(Self::MonthLocked),
            5002 => Ok(Self::UnlockPending),
            9001 => Ok(Self::DatabaseError),
            9002 => Ok(Self::NetworkError),
            9003 => Ok(Self::InternalError),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::PermissionDenied => "Permission denied",
            Self::RecordLocked => "Record is locked",
            Self::InvalidRecordStatus => "Record status transition not allowed",
            Self::MonthLocked => "Month is locked",
            Self::UnlockPending => "Unlock request already pending",
            Self::DatabaseError => "Database error",
            Self::NetworkError => "Storage backend error",
            Self::InternalError => "Internal server error",
        }
    }

    /// Render as the wire format used in API responses, e.g. `E5001`
    pub fn as_wire(&self) -> String {
        format!("E{:04}", *self as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_wire(), self.default_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidFormat,
            ErrorCode::PermissionDenied,
            ErrorCode::MonthLocked,
            ErrorCode::NetworkError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn wire_format_is_zero_padded() {
        assert_eq!(ErrorCode::ValidationFailed.as_wire(), "E0002");
        assert_eq!(ErrorCode::MonthLocked.as_wire(), "E5001");
    }
}
