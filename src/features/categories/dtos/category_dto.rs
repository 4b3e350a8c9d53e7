use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::validation::SLUG_REGEX;

/// Request DTO for creating a category (administrative)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    #[validate(
        length(min = 1, max = 140, message = "Slug must be 1-140 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase alphanumeric with hyphens")
    )]
    pub slug: String,
}

/// Response DTO for a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Response DTO for the category browse page (includes listing count)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryWithCountDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub listing_count: i64,
}

impl From<CategoryWithCount> for CategoryWithCountDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            listing_count: c.listing_count,
        }
    }
}
