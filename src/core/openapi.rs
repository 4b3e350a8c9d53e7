use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::geocode::{dtos as geocode_dtos, handlers as geocode_handlers};
use crate::features::listings::{dtos as listings_dtos, handlers as listings_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users & stores
        users_handlers::store_handler::create_user,
        users_handlers::store_handler::list_stores,
        users_handlers::store_handler::get_store,
        users_handlers::store_handler::update_store,
        // Categories
        categories_handlers::category_handler::list_categories,
        categories_handlers::category_handler::get_category,
        categories_handlers::category_handler::create_category,
        // Listings & search
        listings_handlers::listing_handler::search_listings,
        listings_handlers::listing_handler::create_listing,
        listings_handlers::listing_handler::get_listing,
        listings_handlers::listing_handler::list_store_listings,
        // Reviews & ratings
        reviews_handlers::review_handler::submit_review,
        reviews_handlers::review_handler::list_store_reviews,
        reviews_handlers::review_handler::get_store_rating,
        // Geocode proxy
        geocode_handlers::geocode_handler::geocode_search,
        geocode_handlers::geocode_handler::geocode_reverse,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Users & stores
            users_dtos::CreateUserDto,
            users_dtos::UpdateStoreDto,
            users_dtos::StoreProfileDto,
            users_dtos::UserResponseDto,
            users_dtos::StoreResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<users_dtos::StoreResponseDto>,
            ApiResponse<Vec<users_dtos::StoreResponseDto>>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryWithCountDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryWithCountDto>>,
            // Listings & search
            listings_dtos::CreateListingDto,
            listings_dtos::ListingResponseDto,
            listings_dtos::SearchResponseDto,
            ApiResponse<listings_dtos::ListingResponseDto>,
            ApiResponse<Vec<listings_dtos::ListingResponseDto>>,
            ApiResponse<listings_dtos::SearchResponseDto>,
            // Reviews & ratings
            reviews_dtos::SubmitReviewDto,
            reviews_dtos::ReviewOutcome,
            reviews_dtos::ReviewResponseDto,
            reviews_dtos::SubmitReviewResultDto,
            reviews_dtos::StoreRatingDto,
            ApiResponse<reviews_dtos::SubmitReviewResultDto>,
            ApiResponse<Vec<reviews_dtos::ReviewResponseDto>>,
            ApiResponse<reviews_dtos::StoreRatingDto>,
            // Geocode proxy
            geocode_dtos::PlaceDto,
            ApiResponse<geocode_dtos::PlaceDto>,
            ApiResponse<Vec<geocode_dtos::PlaceDto>>,
        )
    ),
    tags(
        (name = "stores", description = "User rows and seller store profiles"),
        (name = "categories", description = "Category dictionary and browse counts"),
        (name = "listings", description = "Listings and relevance-ranked search"),
        (name = "reviews", description = "Store reviews and aggregated ratings"),
        (name = "geocode", description = "Proxy to the geocoding collaborator"),
    ),
    info(
        title = "Pasar API",
        version = "0.1.0",
        description = "API documentation for the Pasar marketplace core",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
