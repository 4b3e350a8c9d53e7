use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::models::Category;
use crate::features::listings::dtos::{CreateListingDto, ListingResponseDto};
use crate::features::listings::models::Listing;
use crate::features::listings::services::ranking::{matches_query, relevance_score};
use crate::features::users::models::ROLE_SELLER;

const LISTING_COLUMNS: &str =
    "id, title, price, quantity, description, image_ref, seller_id, category_id, created_at";

/// Ordered search results plus the resolved category context
pub struct SearchResults {
    pub listings: Vec<ListingResponseDto>,
    pub current_category: Option<CategoryResponseDto>,
}

/// How a raw category filter resolved: a numeric id always restricts (a
/// dangling id matches zero listings); an unknown slug resolves to no
/// filter and no current-category context.
#[derive(Default)]
struct ResolvedFilter {
    restrict_to: Option<i64>,
    current: Option<Category>,
}

/// Service for listings and ranked search
pub struct ListingService {
    pool: SqlitePool,
}

impl ListingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Post a listing for a seller
    pub async fn create(&self, dto: CreateListingDto) -> Result<ListingResponseDto> {
        if dto.price <= 0.0 {
            return Err(AppError::Validation(
                "Price must be greater than 0".to_string(),
            ));
        }
        let quantity = dto.quantity.unwrap_or(1);
        if quantity <= 0 {
            return Err(AppError::Validation(
                "Quantity must be greater than 0".to_string(),
            ));
        }

        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?1")
            .bind(dto.seller_id)
            .fetch_optional(&self.pool)
            .await?;
        match role.as_deref() {
            None => return Err(AppError::NotFound("Seller not found".to_string())),
            Some(ROLE_SELLER) => {}
            Some(_) => {
                return Err(AppError::Validation(
                    "Only sellers can post listings".to_string(),
                ))
            }
        }

        let category_id = match dto.category.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => self.resolve_filter(raw).await?.current.map(|c| c.id),
            _ => None,
        };

        let description = dto
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_owned);

        let listing = sqlx::query_as::<_, Listing>(&format!(
            "INSERT INTO listings (title, price, quantity, description, image_ref, seller_id, \
                                   category_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {LISTING_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(dto.price)
        .bind(quantity)
        .bind(&description)
        .bind(&dto.image_ref)
        .bind(dto.seller_id)
        .bind(category_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert listing: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Listing created: id={}, seller={}",
            listing.id,
            listing.seller_id
        );

        Ok(listing.into())
    }

    /// Listing detail; hard 404 when absent
    pub async fn get(&self, id: i64) -> Result<ListingResponseDto> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        listing
            .map(|l| l.into())
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))
    }

    /// A store's listings, newest first; hard 404 when the subject is not a
    /// store
    pub async fn list_by_store(&self, seller_id: i64) -> Result<Vec<ListingResponseDto>> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?1")
            .bind(seller_id)
            .fetch_optional(&self.pool)
            .await?;
        match role.as_deref() {
            None => return Err(AppError::NotFound("Store not found".to_string())),
            Some(ROLE_SELLER) => {}
            Some(_) => {
                return Err(AppError::NotFound(
                    "This user is not a store owner".to_string(),
                ))
            }
        }

        let listings = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE seller_id = ?1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings.into_iter().map(|l| l.into()).collect())
    }

    /// Relevance-ranked search.
    ///
    /// Empty query: matching-category listings newest first, no scoring.
    /// Non-empty query: candidates are case-insensitive substring matches on
    /// title or description, ordered by descending relevance score; ties
    /// break by created-at descending, then id descending.
    pub async fn search(&self, query: &str, category: Option<&str>) -> Result<SearchResults> {
        let filter = match category.map(str::trim) {
            Some(raw) if !raw.is_empty() => self.resolve_filter(raw).await?,
            _ => ResolvedFilter::default(),
        };

        let q = query.trim();
        let listings = if q.is_empty() {
            self.browse(&filter).await?
        } else {
            self.ranked(q, &filter).await?
        };

        Ok(SearchResults {
            listings: listings.into_iter().map(|l| l.into()).collect(),
            current_category: filter.current.map(|c| c.into()),
        })
    }

    async fn browse(&self, filter: &ResolvedFilter) -> Result<Vec<Listing>> {
        let listings = match filter.restrict_to {
            Some(category_id) => {
                sqlx::query_as::<_, Listing>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings WHERE category_id = ?1 \
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Listing>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(listings)
    }

    async fn ranked(&self, q: &str, filter: &ResolvedFilter) -> Result<Vec<Listing>> {
        // The LIKE pre-filter narrows the candidate fetch; `matches_query`
        // re-checks with plain substring semantics so LIKE wildcards in the
        // query cannot widen the candidate set.
        let pattern = format!("%{}%", q.to_lowercase());
        let candidates = match filter.restrict_to {
            Some(category_id) => {
                sqlx::query_as::<_, Listing>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings \
                     WHERE (LOWER(title) LIKE ?1 OR LOWER(IFNULL(description, '')) LIKE ?1) \
                       AND category_id = ?2"
                ))
                .bind(&pattern)
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Listing>(&format!(
                    "SELECT {LISTING_COLUMNS} FROM listings \
                     WHERE LOWER(title) LIKE ?1 OR LOWER(IFNULL(description, '')) LIKE ?1"
                ))
                .bind(&pattern)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let now = Utc::now();
        let mut scored: Vec<(i64, Listing)> = candidates
            .into_iter()
            .filter(|l| matches_query(&l.title, l.description.as_deref(), q))
            .map(|l| {
                let score = relevance_score(&l.title, l.description.as_deref(), l.created_at, now, q);
                (score, l)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.created_at.cmp(&a.1.created_at))
                .then_with(|| b.1.id.cmp(&a.1.id))
        });

        Ok(scored.into_iter().map(|(_, l)| l).collect())
    }

    async fn resolve_filter(&self, raw: &str) -> Result<ResolvedFilter> {
        if let Ok(id) = raw.parse::<i64>() {
            let current =
                sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(ResolvedFilter {
                restrict_to: Some(id),
                current,
            })
        } else {
            let current = sqlx::query_as::<_, Category>(
                "SELECT id, name, slug FROM categories WHERE slug = ?1",
            )
            .bind(raw)
            .fetch_optional(&self.pool)
            .await?;
            Ok(ResolvedFilter {
                restrict_to: current.as_ref().map(|c| c.id),
                current,
            })
        }
    }
}
