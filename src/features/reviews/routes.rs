use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reviews::handlers;
use crate::features::reviews::services::ReviewService;

/// Create routes for the reviews feature
pub fn routes(service: Arc<ReviewService>) -> Router {
    Router::new()
        .route(
            "/api/stores/{id}/reviews",
            post(handlers::submit_review).get(handlers::list_store_reviews),
        )
        .route("/api/stores/{id}/rating", get(handlers::get_store_rating))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::shared::test_helpers::{seed_buyer, seed_seller, test_pool};

    #[tokio::test]
    async fn review_submission_round_trip() {
        let pool = test_pool().await;
        let store = seed_seller(&pool, "Maria", "maria@example.com").await;
        let buyer = seed_buyer(&pool, "Ana", "ana@example.com").await;
        let server = TestServer::new(routes(Arc::new(ReviewService::new(pool)))).unwrap();

        let response = server
            .post(&format!("/api/stores/{store}/reviews"))
            .json(&json!({ "reviewer_id": buyer, "rating": 5, "review_text": "Great stall" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["outcome"], "created");

        // A repeat submission replaces instead of inserting
        let response = server
            .post(&format!("/api/stores/{store}/reviews"))
            .json(&json!({ "reviewer_id": buyer, "rating": 2 }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["outcome"], "updated");

        let response = server.get(&format!("/api/stores/{store}/rating")).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["average_rating"], 2.0);
        assert_eq!(body["data"]["review_count"], 1);
    }

    #[tokio::test]
    async fn invalid_and_self_reviews_are_rejected() {
        let pool = test_pool().await;
        let store = seed_seller(&pool, "Maria", "maria@example.com").await;
        let buyer = seed_buyer(&pool, "Ana", "ana@example.com").await;
        let server = TestServer::new(routes(Arc::new(ReviewService::new(pool)))).unwrap();

        let response = server
            .post(&format!("/api/stores/{store}/reviews"))
            .json(&json!({ "reviewer_id": buyer, "rating": 6 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post(&format!("/api/stores/{store}/reviews"))
            .json(&json!({ "reviewer_id": store, "rating": 4 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
