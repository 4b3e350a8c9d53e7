use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::users::dtos::{
    CreateUserDto, StoreResponseDto, UpdateStoreDto, UserResponseDto,
};
use crate::features::users::services::StoreService;
use crate::shared::types::{ApiResponse, Meta};

/// Create a user row (buyer or seller)
///
/// Called by the signup flow after its own credential handling; the core
/// stores the identity and, for sellers, the store profile.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "stores"
)]
pub async fn create_user(
    State(service): State<Arc<StoreService>>,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create_user(dto).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}

/// Store directory with recomputed ratings and counts
#[utoipa::path(
    get,
    path = "/api/stores",
    responses(
        (status = 200, description = "All stores", body = ApiResponse<Vec<StoreResponseDto>>),
    ),
    tag = "stores"
)]
pub async fn list_stores(
    State(service): State<Arc<StoreService>>,
) -> Result<Json<ApiResponse<Vec<StoreResponseDto>>>> {
    let stores = service.list_stores().await?;
    let total = stores.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(stores),
        None,
        Some(Meta { total }),
    )))
}

/// Store page data
#[utoipa::path(
    get,
    path = "/api/stores/{id}",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    responses(
        (status = 200, description = "Store found", body = ApiResponse<StoreResponseDto>),
        (status = 404, description = "Store not found")
    ),
    tag = "stores"
)]
pub async fn get_store(
    State(service): State<Arc<StoreService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StoreResponseDto>>> {
    let store = service.get_store(id).await?;
    Ok(Json(ApiResponse::success(Some(store), None, None)))
}

/// Edit a store profile
#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    params(
        ("id" = i64, Path, description = "Store owner id")
    ),
    request_body = UpdateStoreDto,
    responses(
        (status = 200, description = "Store updated", body = ApiResponse<StoreResponseDto>),
        (status = 404, description = "Store not found")
    ),
    tag = "stores"
)]
pub async fn update_store(
    State(service): State<Arc<StoreService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateStoreDto>,
) -> Result<Json<ApiResponse<StoreResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let store = service.update_store(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(store),
        Some("Store details updated successfully".to_string()),
        None,
    )))
}
