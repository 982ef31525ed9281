//! Utility module - shared helpers and types
//!
//! - [`AppError`] - application-level error type (HTTP boundary)
//! - [`AppResult`] - result alias for handlers
//! - logging and time helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, ok, ok_with_message};
pub use result::AppResult;
