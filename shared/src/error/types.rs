//! Unified API response envelope

use serde::{Deserialize, Serialize};

use super::codes::ErrorCode;

/// Unified API response structure
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Wire error code (`E0000` means success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Trace ID (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.as_wire(),
            message: ErrorCode::Success.default_message().to_string(),
            data: Some(data),
            trace_id: None,
        }
    }

    /// Create a successful response with a custom message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.as_wire(),
            message: message.into(),
            data: Some(data),
            trace_id: None,
        }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_wire(),
            message: message.into(),
            data: None,
            trace_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_serializes_without_nulls() {
        let resp = ApiResponse::success(42);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], "E0000");
        assert_eq!(json["data"], 42);
        assert!(json.get("trace_id").is_none());
    }

    #[test]
    fn error_envelope_carries_code_and_message() {
        let resp = ApiResponse::<()>::error(ErrorCode::NotFound, "summary missing");
        assert_eq!(resp.code, "E0003");
        assert_eq!(resp.message, "summary missing");
        assert!(resp.data.is_none());
    }
}
