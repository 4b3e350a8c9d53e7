use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a marketplace listing
#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub quantity: i64,
    pub description: Option<String>,
    /// Reference returned by the file-storage collaborator
    pub image_ref: Option<String>,
    pub seller_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
