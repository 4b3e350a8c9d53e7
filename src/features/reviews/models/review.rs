use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Database model for a store review
///
/// At most one row exists per (store_owner_id, reviewer_id); enforced by a
/// unique index and the submit upsert.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: i64,
    pub store_owner_id: i64,
    pub reviewer_id: i64,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}
