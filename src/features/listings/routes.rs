use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::services::CategoryService;
use crate::features::listings::handlers::{self, ListingState};
use crate::features::listings::services::ListingService;

/// Create routes for the listings feature
pub fn routes(
    listing_service: Arc<ListingService>,
    category_service: Arc<CategoryService>,
) -> Router {
    let state = ListingState {
        listing_service,
        category_service,
    };

    Router::new()
        .route(
            "/api/listings",
            get(handlers::search_listings).post(handlers::create_listing),
        )
        .route("/api/listings/{id}", get(handlers::get_listing))
        .route("/api/stores/{id}/listings", get(handlers::list_store_listings))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::shared::test_helpers::{seed_listing, seed_seller, test_pool};

    async fn server(pool: &sqlx::SqlitePool) -> TestServer {
        TestServer::new(routes(
            Arc::new(ListingService::new(pool.clone())),
            Arc::new(CategoryService::new(pool.clone())),
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn search_endpoint_returns_ranked_listings_with_category_context() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "Maria", "maria@example.com").await;
        let now = chrono::Utc::now();
        seed_listing(&pool, seller, "fresh apple pie", None, None, now).await;
        seed_listing(&pool, seller, "apple", None, None, now).await;
        let server = server(&pool).await;

        let response = server.get("/api/listings").add_query_param("q", "apple").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();

        let titles: Vec<&str> = body["data"]["listings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["apple", "fresh apple pie"]);
        assert_eq!(body["data"]["categories"].as_array().unwrap().len(), 8);
        assert!(body["data"]["current_category"].is_null());
        assert_eq!(body["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn post_listing_rejects_non_positive_price() {
        let pool = test_pool().await;
        let seller = seed_seller(&pool, "Maria", "maria@example.com").await;
        let server = server(&pool).await;

        let response = server
            .post("/api/listings")
            .json(&json!({ "title": "Kingfish", "price": -5.0, "seller_id": seller }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/listings")
            .json(&json!({ "title": "Kingfish", "price": 300.0, "seller_id": seller }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["quantity"], 1);
    }
}
