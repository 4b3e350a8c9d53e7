use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CategoryWithCountDto, CreateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryWithCount};

/// Service for category operations
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories name-ascending, each with its listing count
    pub async fn list(&self) -> Result<Vec<CategoryWithCountDto>> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.slug, COUNT(l.id) AS listing_count
             FROM categories c
             LEFT JOIN listings l ON l.category_id = c.id
             GROUP BY c.id, c.name, c.slug
             ORDER BY c.name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug FROM categories WHERE slug = ?1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by slug: {:?}", e);
            AppError::Database(e)
        })?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Create a category (administrative; the default set comes from the seed)
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug) VALUES (?1, ?2) RETURNING id, name, slug",
        )
        .bind(&dto.name)
        .bind(&dto.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "A category with this name or slug already exists".to_string(),
            ),
            _ => {
                tracing::error!("Failed to insert category: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seed_listing, seed_seller, test_pool};

    #[tokio::test]
    async fn list_is_name_ascending_with_counts() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());

        let seller = seed_seller(&pool, "Rui", "rui@example.com").await;
        let seafood = service.get_by_slug("seafood").await.unwrap();
        seed_listing(
            &pool,
            seller,
            "Kingfish",
            None,
            Some(seafood.id),
            chrono::Utc::now(),
        )
        .await;

        let categories = service.list().await.unwrap();
        assert_eq!(categories.len(), 8);
        // "Art" sorts first in the seeded set
        assert_eq!(categories[0].name, "Art");
        let seafood_entry = categories.iter().find(|c| c.slug == "seafood").unwrap();
        assert_eq!(seafood_entry.listing_count, 1);
        let art_entry = categories.iter().find(|c| c.slug == "art").unwrap();
        assert_eq!(art_entry.listing_count, 0);
    }

    #[tokio::test]
    async fn get_by_slug_misses_with_not_found() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool);

        assert!(service.get_by_slug("spices").await.is_ok());
        let err = service.get_by_slug("no-such-category").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool);

        let err = service
            .create(CreateCategoryDto {
                name: "Fresh Seafood".to_string(),
                slug: "seafood".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let created = service
            .create(CreateCategoryDto {
                name: "Pottery".to_string(),
                slug: "pottery".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.slug, "pottery");
    }
}
