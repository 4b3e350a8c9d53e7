use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{Role, StoreProfile, User};

fn default_role() -> String {
    crate::features::users::models::ROLE_BUYER.to_string()
}

/// Request DTO for creating a user row at signup
///
/// Passwords and sessions live in the auth layer; the core persists the
/// identity and (for sellers) the store profile only.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// "buyer" (default) or "seller"
    #[serde(default = "default_role")]
    pub role: String,

    // Store profile; required when role is "seller"
    #[validate(length(max = 150, message = "Store name must not exceed 150 characters"))]
    pub store_name: Option<String>,
    #[validate(length(max = 200, message = "Store location must not exceed 200 characters"))]
    pub store_location: Option<String>,
    #[validate(length(max = 100, message = "Store city must not exceed 100 characters"))]
    pub store_city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    /// Reference returned by the file-storage collaborator, never raw bytes
    pub store_image: Option<String>,
}

/// Request DTO for editing a store profile
///
/// Absent or empty fields keep their current values.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateStoreDto {
    #[validate(length(max = 150, message = "Store name must not exceed 150 characters"))]
    pub store_name: Option<String>,
    #[validate(length(max = 200, message = "Store location must not exceed 200 characters"))]
    pub store_location: Option<String>,
    #[validate(length(max = 100, message = "Store city must not exceed 100 characters"))]
    pub store_city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub store_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreProfileDto {
    pub name: String,
    pub location: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub image: Option<String>,
}

impl From<StoreProfile> for StoreProfileDto {
    fn from(p: StoreProfile) -> Self {
        Self {
            name: p.name,
            location: p.location,
            city: p.city,
            latitude: p.latitude,
            longitude: p.longitude,
            address: p.address,
            image: p.image,
        }
    }
}

/// Response DTO for a user row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreProfileDto>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        let (role, store) = match user.role {
            Role::Buyer => (crate::features::users::models::ROLE_BUYER, None),
            Role::Seller(profile) => (
                crate::features::users::models::ROLE_SELLER,
                Some(profile.into()),
            ),
        };
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: role.to_string(),
            store,
        }
    }
}

/// Response DTO for the store directory and store page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreResponseDto {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<String>,
    /// Absent when the store has no reviews yet
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub listing_count: i64,
}
