use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::geocode::handlers;
use crate::features::geocode::services::GeocodeService;

/// Create routes for the geocode proxy
pub fn routes(service: Arc<GeocodeService>) -> Router {
    Router::new()
        .route("/api/geocode/search", get(handlers::geocode_search))
        .route("/api/geocode/reverse", get(handlers::geocode_reverse))
        .with_state(service)
}
