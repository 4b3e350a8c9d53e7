use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::reviews::models::Review;

/// Request DTO for submitting (or replacing) a store review
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReviewDto {
    /// The reviewing user. Identity checks live in the session layer; the
    /// core only enforces catalog invariants for the pair.
    pub reviewer_id: i64,

    /// Star rating, 1-5. Absent or out-of-range fails validation.
    pub rating: Option<i64>,

    #[validate(length(max = 5000, message = "Review text must not exceed 5000 characters"))]
    pub review_text: Option<String>,
}

/// Whether a submission inserted a new review or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Created,
    Updated,
}

/// Response DTO for a review
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponseDto {
    pub id: i64,
    pub store_owner_id: i64,
    pub reviewer_id: i64,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponseDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            store_owner_id: r.store_owner_id,
            reviewer_id: r.reviewer_id,
            rating: r.rating,
            review_text: r.review_text,
            created_at: r.created_at,
        }
    }
}

/// Response DTO for a successful submission
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitReviewResultDto {
    pub review: ReviewResponseDto,
    pub outcome: ReviewOutcome,
}

/// Response DTO for a store's aggregated rating
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreRatingDto {
    /// Absent when the store has no reviews (distinct from a zero rating)
    pub average_rating: Option<f64>,
    pub review_count: i64,
}
