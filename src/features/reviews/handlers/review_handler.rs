use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reviews::dtos::{
    ReviewOutcome, ReviewResponseDto, StoreRatingDto, SubmitReviewDto, SubmitReviewResultDto,
};
use crate::features::reviews::services::ReviewService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit or replace a review for a store
///
/// One review per reviewer per store: a repeat submission replaces the
/// rating, text and timestamp of the existing review.
#[utoipa::path(
    post,
    path = "/api/stores/{id}/reviews",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    request_body = SubmitReviewDto,
    responses(
        (status = 200, description = "Review created or updated", body = ApiResponse<SubmitReviewResultDto>),
        (status = 400, description = "Invalid rating or self-review"),
        (status = 404, description = "Store not found")
    ),
    tag = "reviews"
)]
pub async fn submit_review(
    State(service): State<Arc<ReviewService>>,
    Path(store_owner_id): Path<i64>,
    AppJson(dto): AppJson<SubmitReviewDto>,
) -> Result<Json<ApiResponse<SubmitReviewResultDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.submit(store_owner_id, dto).await?;
    let message = match result.outcome {
        ReviewOutcome::Created => "Your review has been added",
        ReviewOutcome::Updated => "Your review has been updated",
    };
    Ok(Json(ApiResponse::success(
        Some(result),
        Some(message.to_string()),
        None,
    )))
}

/// List a store's reviews, newest first
#[utoipa::path(
    get,
    path = "/api/stores/{id}/reviews",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    responses(
        (status = 200, description = "Reviews for the store", body = ApiResponse<Vec<ReviewResponseDto>>),
        (status = 404, description = "Store not found")
    ),
    tag = "reviews"
)]
pub async fn list_store_reviews(
    State(service): State<Arc<ReviewService>>,
    Path(store_owner_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<ReviewResponseDto>>>> {
    let reviews = service.list_for_store(store_owner_id).await?;
    let total = reviews.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(reviews),
        None,
        Some(Meta { total }),
    )))
}

/// Get a store's aggregated rating
///
/// Recomputed from the live review rows on every call; the average is
/// absent (not zero) when the store has no reviews.
#[utoipa::path(
    get,
    path = "/api/stores/{id}/rating",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    responses(
        (status = 200, description = "Aggregated rating", body = ApiResponse<StoreRatingDto>),
    ),
    tag = "reviews"
)]
pub async fn get_store_rating(
    State(service): State<Arc<ReviewService>>,
    Path(store_owner_id): Path<i64>,
) -> Result<Json<ApiResponse<StoreRatingDto>>> {
    let rating = StoreRatingDto {
        average_rating: service.average_rating(store_owner_id).await?,
        review_count: service.review_count(store_owner_id).await?,
    };
    Ok(Json(ApiResponse::success(Some(rating), None, None)))
}
