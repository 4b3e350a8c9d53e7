use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::StoreService;

/// Create routes for the users/stores feature
pub fn routes(service: Arc<StoreService>) -> Router {
    Router::new()
        .route("/api/users", post(handlers::create_user))
        .route("/api/stores", get(handlers::list_stores))
        .route(
            "/api/stores/{id}",
            get(handlers::get_store).put(handlers::update_store),
        )
        .with_state(service)
}
