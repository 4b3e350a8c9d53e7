use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::reviews::ReviewService;
use crate::features::users::dtos::{
    CreateUserDto, StoreResponseDto, UpdateStoreDto, UserResponseDto,
};
use crate::features::users::models::{User, UserRow, ROLE_BUYER, ROLE_SELLER};

const USER_COLUMNS: &str = "id, username, email, role, store_name, store_location, store_city, \
                            store_latitude, store_longitude, store_address, store_image";

/// Service for user rows and store profiles
pub struct StoreService {
    pool: SqlitePool,
    reviews: Arc<ReviewService>,
}

impl StoreService {
    pub fn new(pool: SqlitePool, reviews: Arc<ReviewService>) -> Self {
        Self { pool, reviews }
    }

    /// Persist the identity row created at signup. Sellers must carry a
    /// store profile; buyers never do, whatever the request says.
    pub async fn create_user(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        let is_seller = match dto.role.as_str() {
            ROLE_SELLER => true,
            ROLE_BUYER => false,
            other => {
                return Err(AppError::Validation(format!(
                    "Role must be '{ROLE_BUYER}' or '{ROLE_SELLER}', got '{other}'"
                )))
            }
        };

        let (store_name, store_location, store_city, latitude, longitude, address, image) =
            if is_seller {
                let name = non_empty(dto.store_name.clone());
                let location = non_empty(dto.store_location.clone());
                let city = non_empty(dto.store_city.clone());
                if name.is_none() || location.is_none() || city.is_none() {
                    return Err(AppError::Validation(
                        "Store name, location and city are required for sellers".to_string(),
                    ));
                }
                (
                    name,
                    location,
                    city,
                    dto.latitude,
                    dto.longitude,
                    non_empty(dto.address.clone()),
                    non_empty(dto.store_image.clone()),
                )
            } else {
                (None, None, None, None, None, None, None)
            };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, role, store_name, store_location, store_city, \
                                store_latitude, store_longitude, store_address, store_image)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(if is_seller { ROLE_SELLER } else { ROLE_BUYER })
        .bind(&store_name)
        .bind(&store_location)
        .bind(&store_city)
        .bind(latitude)
        .bind(longitude)
        .bind(&address)
        .bind(&image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                "An account with this email already exists".to_string(),
            ),
            _ => {
                tracing::error!("Failed to insert user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("User created: id={}, role={}", row.id, row.role);

        Ok(User::from(row).into())
    }

    /// Store page data; hard 404 when the user is absent or not a seller
    pub async fn get_store(&self, store_owner_id: i64) -> Result<StoreResponseDto> {
        let user = self.get_user(store_owner_id).await?;
        if !user.is_seller() {
            return Err(AppError::NotFound(
                "This user is not a store owner".to_string(),
            ));
        }
        self.store_dto(user).await
    }

    /// Store directory: every seller with its recomputed rating and counts
    pub async fn list_stores(&self) -> Result<Vec<StoreResponseDto>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY id ASC"
        ))
        .bind(ROLE_SELLER)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list stores: {:?}", e);
            AppError::Database(e)
        })?;

        let mut stores = Vec::with_capacity(rows.len());
        for row in rows {
            stores.push(self.store_dto(row.into()).await?);
        }
        Ok(stores)
    }

    /// Edit a store profile. Absent or empty fields keep their current
    /// values; the write is one explicit UPDATE returning the confirmed row.
    pub async fn update_store(
        &self,
        store_owner_id: i64,
        dto: UpdateStoreDto,
    ) -> Result<StoreResponseDto> {
        let current = self.get_user(store_owner_id).await?;
        let profile = current.store_profile().ok_or_else(|| {
            AppError::NotFound("This user is not a store owner".to_string())
        })?;

        let store_name = non_empty(dto.store_name).unwrap_or_else(|| profile.name.clone());
        let store_location = non_empty(dto.store_location).or_else(|| profile.location.clone());
        let store_city = non_empty(dto.store_city).or_else(|| profile.city.clone());
        let latitude = dto.latitude.or(profile.latitude);
        let longitude = dto.longitude.or(profile.longitude);
        let address = non_empty(dto.address).or_else(|| profile.address.clone());
        let image = non_empty(dto.store_image).or_else(|| profile.image.clone());

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET store_name = ?1, store_location = ?2, store_city = ?3, \
                              store_latitude = ?4, store_longitude = ?5, store_address = ?6, \
                              store_image = ?7
             WHERE id = ?8
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&store_name)
        .bind(&store_location)
        .bind(&store_city)
        .bind(latitude)
        .bind(longitude)
        .bind(&address)
        .bind(&image)
        .bind(store_owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update store: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Store updated: id={}", store_owner_id);

        self.store_dto(row.into()).await
    }

    async fn get_user(&self, user_id: i64) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from)
            .ok_or_else(|| AppError::NotFound("Store not found".to_string()))
    }

    async fn store_dto(&self, user: User) -> Result<StoreResponseDto> {
        let listing_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE seller_id = ?1")
                .bind(user.id)
                .fetch_one(&self.pool)
                .await?;
        let average_rating = self.reviews.average_rating(user.id).await?;
        let review_count = self.reviews.review_count(user.id).await?;

        let id = user.id;
        let profile = user.store_profile().cloned().ok_or_else(|| {
            AppError::Internal(format!("User {id} has no store profile"))
        })?;

        Ok(StoreResponseDto {
            id,
            name: profile.name,
            city: profile.city,
            location: profile.location,
            address: profile.address,
            latitude: profile.latitude,
            longitude: profile.longitude,
            image: profile.image,
            average_rating,
            review_count,
            listing_count,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reviews::dtos::SubmitReviewDto;
    use crate::shared::test_helpers::{seed_buyer, seed_listing, seed_seller, test_pool};

    fn service(pool: &SqlitePool) -> StoreService {
        StoreService::new(pool.clone(), Arc::new(ReviewService::new(pool.clone())))
    }

    fn seller_dto(username: &str, email: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            email: email.to_string(),
            role: ROLE_SELLER.to_string(),
            store_name: Some(format!("{username}'s store")),
            store_location: Some("Harbourside market".to_string()),
            store_city: Some("Panjim".to_string()),
            latitude: Some(15.4989),
            longitude: Some(73.8278),
            address: None,
            store_image: None,
        }
    }

    #[tokio::test]
    async fn buyer_rows_never_carry_store_fields() {
        let pool = test_pool().await;
        let service = service(&pool);

        let mut dto = seller_dto("Ana", "ana@example.com");
        dto.role = ROLE_BUYER.to_string();
        let created = service.create_user(dto).await.unwrap();
        assert_eq!(created.role, ROLE_BUYER);
        assert!(created.store.is_none());

        let err = service.get_store(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn seller_requires_store_profile() {
        let pool = test_pool().await;
        let service = service(&pool);

        let mut dto = seller_dto("Maria", "maria@example.com");
        dto.store_city = Some("".to_string());
        let err = service.create_user(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let created = service
            .create_user(seller_dto("Maria", "maria@example.com"))
            .await
            .unwrap();
        assert_eq!(created.store.as_ref().unwrap().name, "Maria's store");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        let service = service(&pool);

        service
            .create_user(seller_dto("Maria", "maria@example.com"))
            .await
            .unwrap();
        let err = service
            .create_user(seller_dto("Other", "maria@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn store_directory_recomputes_ratings_and_counts() {
        let pool = test_pool().await;
        let service = service(&pool);
        let reviews = ReviewService::new(pool.clone());

        let store = seed_seller(&pool, "Maria", "maria@example.com").await;
        let buyer = seed_buyer(&pool, "Ana", "ana@example.com").await;
        seed_listing(&pool, store, "Kingfish", None, None, chrono::Utc::now()).await;
        reviews
            .submit(
                store,
                SubmitReviewDto {
                    reviewer_id: buyer,
                    rating: Some(4),
                    review_text: None,
                },
            )
            .await
            .unwrap();

        let stores = service.list_stores().await.unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].average_rating, Some(4.0));
        assert_eq!(stores[0].review_count, 1);
        assert_eq!(stores[0].listing_count, 1);
    }

    #[tokio::test]
    async fn update_keeps_current_values_for_empty_fields() {
        let pool = test_pool().await;
        let service = service(&pool);
        let store = seed_seller(&pool, "Maria", "maria@example.com").await;

        let updated = service
            .update_store(
                store,
                UpdateStoreDto {
                    store_name: Some("".to_string()),
                    store_location: None,
                    store_city: Some("Margao".to_string()),
                    latitude: Some(15.27),
                    longitude: None,
                    address: None,
                    store_image: None,
                },
            )
            .await
            .unwrap();

        // Empty name keeps the seeded one, city and latitude change
        assert_eq!(updated.name, "Maria's store");
        assert_eq!(updated.city.as_deref(), Some("Margao"));
        assert_eq!(updated.latitude, Some(15.27));
        assert_eq!(updated.location.as_deref(), Some("Harbourside market"));
    }
}
