use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::geocode::dtos::{GeocodeReverseQuery, GeocodeSearchQuery, PlaceDto};
use crate::features::geocode::services::GeocodeService;
use crate::shared::constants::DEFAULT_GEOCODE_LIMIT;
use crate::shared::types::{ApiResponse, Meta};

/// Search place candidates by free-form text
///
/// Upstream failure or timeout yields an empty list, never an error.
#[utoipa::path(
    get,
    path = "/api/geocode/search",
    params(GeocodeSearchQuery),
    responses(
        (status = 200, description = "Place candidates", body = ApiResponse<Vec<PlaceDto>>),
    ),
    tag = "geocode"
)]
pub async fn geocode_search(
    State(service): State<Arc<GeocodeService>>,
    Query(query): Query<GeocodeSearchQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceDto>>>> {
    let places = service
        .search(
            query.q.as_deref().unwrap_or(""),
            query.limit.unwrap_or(DEFAULT_GEOCODE_LIMIT),
        )
        .await;
    let total = places.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(places),
        None,
        Some(Meta { total }),
    )))
}

/// Resolve coordinates into a place
#[utoipa::path(
    get,
    path = "/api/geocode/reverse",
    params(GeocodeReverseQuery),
    responses(
        (status = 200, description = "Place detail, null when unresolvable", body = ApiResponse<PlaceDto>),
        (status = 400, description = "Missing coordinates")
    ),
    tag = "geocode"
)]
pub async fn geocode_reverse(
    State(service): State<Arc<GeocodeService>>,
    Query(query): Query<GeocodeReverseQuery>,
) -> Result<Json<ApiResponse<Option<PlaceDto>>>> {
    let (lat, lon) = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(AppError::BadRequest(
                "Both lat and lon are required".to_string(),
            ))
        }
    };

    let place = service.reverse(lat, lon).await;
    Ok(Json(ApiResponse::success(Some(place), None, None)))
}
