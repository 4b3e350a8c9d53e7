use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::categories::services::CategoryService;
use crate::features::listings::dtos::{
    CreateListingDto, ListingResponseDto, SearchQuery, SearchResponseDto,
};
use crate::features::listings::services::ListingService;
use crate::shared::types::{ApiResponse, Meta};

#[derive(Clone)]
pub struct ListingState {
    pub listing_service: Arc<ListingService>,
    pub category_service: Arc<CategoryService>,
}

/// Browse or search listings
///
/// With `q` empty, returns matching-category listings newest first. With a
/// non-empty `q`, returns candidates ordered by descending relevance score.
#[utoipa::path(
    get,
    path = "/api/listings",
    params(SearchQuery),
    responses(
        (status = 200, description = "Ordered listings with category context", body = ApiResponse<SearchResponseDto>),
    ),
    tag = "listings"
)]
pub async fn search_listings(
    State(state): State<ListingState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponseDto>>> {
    let results = state
        .listing_service
        .search(query.q.as_deref().unwrap_or(""), query.category.as_deref())
        .await?;
    let categories = state.category_service.list().await?;

    let total = results.listings.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(SearchResponseDto {
            listings: results.listings,
            categories,
            current_category: results.current_category,
        }),
        None,
        Some(Meta { total }),
    )))
}

/// Post a listing
#[utoipa::path(
    post,
    path = "/api/listings",
    request_body = CreateListingDto,
    responses(
        (status = 200, description = "Listing created", body = ApiResponse<ListingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Seller not found")
    ),
    tag = "listings"
)]
pub async fn create_listing(
    State(state): State<ListingState>,
    AppJson(dto): AppJson<CreateListingDto>,
) -> Result<Json<ApiResponse<ListingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let listing = state.listing_service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(listing),
        Some("Listing posted successfully".to_string()),
        None,
    )))
}

/// Listing detail
#[utoipa::path(
    get,
    path = "/api/listings/{id}",
    params(
        ("id" = i64, Path, description = "Listing id")
    ),
    responses(
        (status = 200, description = "Listing found", body = ApiResponse<ListingResponseDto>),
        (status = 404, description = "Listing not found")
    ),
    tag = "listings"
)]
pub async fn get_listing(
    State(state): State<ListingState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ListingResponseDto>>> {
    let listing = state.listing_service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(listing), None, None)))
}

/// A store's listings, newest first
#[utoipa::path(
    get,
    path = "/api/stores/{id}/listings",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    responses(
        (status = 200, description = "The store's listings", body = ApiResponse<Vec<ListingResponseDto>>),
        (status = 404, description = "Store not found")
    ),
    tag = "listings"
)]
pub async fn list_store_listings(
    State(state): State<ListingState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ListingResponseDto>>>> {
    let listings = state.listing_service.list_by_store(id).await?;
    let total = listings.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(listings),
        None,
        Some(Meta { total }),
    )))
}
