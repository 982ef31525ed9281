//! Shared types for the Franchise HQ back-office
//!
//! Common types used by the server and its clients: error codes, the
//! unified API response envelope, message-bus events, and utility helpers.

pub mod error;
pub mod message;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, ErrorCategory, ErrorCode};
pub use message::{BusMessage, EventType, NotificationPayload, SyncPayload};
