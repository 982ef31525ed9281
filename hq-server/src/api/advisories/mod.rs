//! Advisories API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/advisories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/compute", post(handler::compute))
        .route("/break-even", post(handler::break_even))
}
