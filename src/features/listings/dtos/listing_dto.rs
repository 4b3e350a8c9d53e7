use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::categories::dtos::{CategoryResponseDto, CategoryWithCountDto};
use crate::features::listings::models::Listing;

/// Request DTO for posting a listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateListingDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub price: f64,

    /// Defaults to 1 when absent
    pub quantity: Option<i64>,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,

    /// Reference returned by the file-storage collaborator, never raw bytes
    pub image_ref: Option<String>,

    /// The posting seller. Identity checks live in the session layer.
    pub seller_id: i64,

    /// Optional category, given as a numeric id or a slug. An unresolvable
    /// value stores the listing uncategorized.
    pub category: Option<String>,
}

/// Search query parameters for the listings page
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Free-text query; empty means "browse newest first"
    pub q: Option<String>,
    /// Category filter, a numeric id or a slug
    pub category: Option<String>,
}

/// Response DTO for a listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingResponseDto {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub quantity: i64,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub seller_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Listing> for ListingResponseDto {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            title: l.title,
            price: l.price,
            quantity: l.quantity,
            description: l.description,
            image_ref: l.image_ref,
            seller_id: l.seller_id,
            category_id: l.category_id,
            created_at: l.created_at,
        }
    }
}

/// Response DTO for the browse/search page: the ordered listings plus the
/// category context the rendering layer needs
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponseDto {
    pub listings: Vec<ListingResponseDto>,
    pub categories: Vec<CategoryWithCountDto>,
    pub current_category: Option<CategoryResponseDto>,
}
