//! Unified error handling
//!
//! Application-level error type and response mapping:
//! - [`AppError`] - application error enum
//! - [`shared::ApiResponse`] - API response envelope
//!
//! # Error code policy
//!
//! Wire codes come from [`shared::ErrorCode`] (`E0000` success, `E2001`
//! permission denied, `E9002` storage backend error, ...). Domain errors
//! ([`crate::FinanceError`]) convert losslessly into [`AppError`] so
//! handlers can use `?` throughout.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use shared::{ApiResponse, ErrorCode};

use crate::db::repository::FinanceError;

/// Application error enum
///
/// | Class | Description |
/// |-------|-------------|
/// | Business | not found, validation, format, permission |
/// | System | storage backend, internal |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business errors (4xx) ==========
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== System errors (5xx) ==========
    #[error("Storage backend error: {0}")]
    Network(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::PermissionDenied, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, ErrorCode::AlreadyExists, msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, msg.clone())
            }
            AppError::InvalidFormat(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidFormat, msg.clone())
            }
            AppError::BusinessRule(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidRequest,
                msg.clone(),
            ),
            AppError::Network(msg) => {
                error!(target: "storage", error = %msg, "Storage backend error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::NetworkError,
                    "Storage backend error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(code, message));

        (status, body).into_response()
    }
}

impl From<FinanceError> for AppError {
    fn from(e: FinanceError) -> Self {
        match e {
            FinanceError::PermissionDenied { franchise_id } => {
                AppError::Forbidden(format!("Franchise access denied: {franchise_id}"))
            }
            FinanceError::Validation { field, message } => {
                AppError::Validation(format!("{field}: {message}"))
            }
            FinanceError::NotFound { .. } => AppError::NotFound(e.to_string()),
            FinanceError::InvalidFormat {
                field,
                expected,
                received,
            } => AppError::InvalidFormat(format!(
                "{field}: expected {expected}, received {received}"
            )),
            FinanceError::Network { cause } => AppError::Network(cause),
            FinanceError::Unknown { message } => AppError::Internal(message),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(data, message))
}
