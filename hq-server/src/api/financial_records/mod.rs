//! Financial Records API module

mod handler;

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/financial-records", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/pending", get(handler::pending))
        .route("/submit", post(handler::submit_drafts))
        .route("/lock-month", post(handler::lock_month))
        .route("/clear", post(handler::clear))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}", delete(handler::remove))
}
