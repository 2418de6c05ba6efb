use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all document endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/create", post(handler::create_handler))
        .route("/read/", get(handler::missing_id_handler))
        .route("/read/:id", get(handler::read_handler))
        .route("/readall", get(handler::read_all_handler))
        .route("/delete/", delete(handler::missing_id_handler))
        .route("/delete/:id", delete(handler::delete_handler))
        .route("/health", get(handler::health_handler))
        .route("/info", get(handler::info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
