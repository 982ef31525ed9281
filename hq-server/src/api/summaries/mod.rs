//! Monthly Summaries API module (closing workflow)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/summaries", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/document/{id}",
            axum::routing::delete(handler::delete_document),
        )
        .route("/{franchise_id}", get(handler::closures))
        .route("/{franchise_id}/year/{year}", get(handler::yearly))
        .route(
            "/{franchise_id}/{month}",
            get(handler::get_month)
                .put(handler::update_month)
                .delete(handler::reset_month),
        )
        .route(
            "/{franchise_id}/{month}/request-unlock",
            post(handler::request_unlock),
        )
        .route("/{franchise_id}/{month}/unlock", post(handler::unlock))
        .route(
            "/{franchise_id}/{month}/reject-unlock",
            post(handler::reject_unlock),
        )
        .route(
            "/{franchise_id}/{month}/recalculate",
            post(handler::recalculate),
        )
}
