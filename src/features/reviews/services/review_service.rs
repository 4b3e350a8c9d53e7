use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::reviews::dtos::{
    ReviewOutcome, ReviewResponseDto, SubmitReviewDto, SubmitReviewResultDto,
};
use crate::features::reviews::models::{Review, MAX_RATING, MIN_RATING};
use crate::features::users::models::ROLE_SELLER;

/// Service for review submission and rating aggregation
pub struct ReviewService {
    pool: SqlitePool,
}

impl ReviewService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a review with create-or-replace semantics: one review per
    /// (store owner, reviewer) pair. A repeat submission replaces rating,
    /// text and timestamp of the existing row.
    ///
    /// The lookup and the write run in one transaction against the unique
    /// index on (store_owner_id, reviewer_id), so concurrent first-time
    /// submissions for the same pair cannot produce two rows.
    pub async fn submit(
        &self,
        store_owner_id: i64,
        dto: SubmitReviewDto,
    ) -> Result<SubmitReviewResultDto> {
        let rating = dto
            .rating
            .ok_or_else(|| AppError::Validation("Rating is required".to_string()))?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        if dto.reviewer_id == store_owner_id {
            return Err(AppError::SelfReview);
        }

        let owner_role = self
            .role_of(store_owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
        if owner_role != ROLE_SELLER {
            return Err(AppError::NotFound(
                "This user is not a store owner".to_string(),
            ));
        }
        self.role_of(dto.reviewer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reviewer not found".to_string()))?;

        let review_text = dto
            .review_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM reviews WHERE store_owner_id = ?1 AND reviewer_id = ?2",
        )
        .bind(store_owner_id)
        .bind(dto.reviewer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (store_owner_id, reviewer_id, rating, review_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(store_owner_id, reviewer_id) DO UPDATE SET
                 rating = excluded.rating,
                 review_text = excluded.review_text,
                 created_at = excluded.created_at
             RETURNING id, store_owner_id, reviewer_id, rating, review_text, created_at",
        )
        .bind(store_owner_id)
        .bind(dto.reviewer_id)
        .bind(rating)
        .bind(&review_text)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert review: {:?}", e);
            AppError::Database(e)
        })?;

        tx.commit().await?;

        let outcome = if existing.is_some() {
            ReviewOutcome::Updated
        } else {
            ReviewOutcome::Created
        };
        tracing::info!(
            "Review {:?} for store {} by reviewer {}: {} star(s)",
            outcome,
            store_owner_id,
            dto.reviewer_id,
            rating
        );

        Ok(SubmitReviewResultDto {
            review: review.into(),
            outcome,
        })
    }

    /// Average rating for a store, recomputed from the live review rows on
    /// every call and rounded half-up to one decimal place.
    ///
    /// `None` when the subject is not a seller or has no reviews yet; a
    /// store with no reviews is not a store rated zero.
    pub async fn average_rating(&self, store_owner_id: i64) -> Result<Option<f64>> {
        if !self.is_seller(store_owner_id).await? {
            return Ok(None);
        }

        let ratings: Vec<i64> =
            sqlx::query_scalar("SELECT rating FROM reviews WHERE store_owner_id = ?1")
                .bind(store_owner_id)
                .fetch_all(&self.pool)
                .await?;
        if ratings.is_empty() {
            return Ok(None);
        }

        let mean = ratings.iter().sum::<i64>() as f64 / ratings.len() as f64;
        Ok(Some((mean * 10.0).round() / 10.0))
    }

    /// Number of reviews for a store; 0 for non-sellers
    pub async fn review_count(&self, store_owner_id: i64) -> Result<i64> {
        if !self.is_seller(store_owner_id).await? {
            return Ok(0);
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE store_owner_id = ?1")
                .bind(store_owner_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Reviews for a store page, newest first. Hard 404 when the subject is
    /// not a store.
    pub async fn list_for_store(&self, store_owner_id: i64) -> Result<Vec<ReviewResponseDto>> {
        let role = self
            .role_of(store_owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))?;
        if role != ROLE_SELLER {
            return Err(AppError::NotFound(
                "This user is not a store owner".to_string(),
            ));
        }

        let reviews = sqlx::query_as::<_, Review>(
            "SELECT id, store_owner_id, reviewer_id, rating, review_text, created_at
             FROM reviews
             WHERE store_owner_id = ?1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(store_owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reviews: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(reviews.into_iter().map(|r| r.into()).collect())
    }

    async fn role_of(&self, user_id: i64) -> Result<Option<String>> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn is_seller(&self, user_id: i64) -> Result<bool> {
        Ok(self.role_of(user_id).await?.as_deref() == Some(ROLE_SELLER))
    }
}
