//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`financial_records`] - transaction CRUD, review inbox, fiscal lock
//! - [`summaries`] - monthly closing workflow and aggregation repairs
//! - [`trends`] - multi-month dashboard series
//! - [`advisories`] - advisory tips and break-even
//! - [`reports`] - expense report and tariff revenue derivation
//! - [`franchises`] - franchise master data and rate tables
//! - [`notifications`] - notification inbox

pub mod advisories;
pub mod financial_records;
pub mod franchises;
pub mod health;
pub mod notifications;
pub mod reports;
pub mod summaries;
pub mod trends;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok};

/// Compose the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(financial_records::router())
        .merge(summaries::router())
        .merge(trends::router())
        .merge(advisories::router())
        .merge(reports::router())
        .merge(franchises::router())
        .merge(notifications::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
