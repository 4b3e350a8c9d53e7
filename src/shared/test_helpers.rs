#[cfg(test)]
use std::str::FromStr;

#[cfg(test)]
use chrono::{DateTime, Utc};
#[cfg(test)]
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::core::evolution::SchemaEvolution;

/// In-memory catalog with the current schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database; a second connection would see an empty one.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    SchemaEvolution::new(pool.clone()).run().await;
    pool
}

#[cfg(test)]
pub async fn seed_buyer(pool: &SqlitePool, username: &str, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, role) VALUES (?1, ?2, 'buyer') RETURNING id",
    )
    .bind(username)
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[cfg(test)]
pub async fn seed_seller(pool: &SqlitePool, username: &str, email: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, role, store_name, store_location, store_city) \
         VALUES (?1, ?2, 'seller', ?3, 'Harbourside market', 'Panjim') RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(format!("{username}'s store"))
    .fetch_one(pool)
    .await
    .unwrap()
}

#[cfg(test)]
pub async fn seed_listing(
    pool: &SqlitePool,
    seller_id: i64,
    title: &str,
    description: Option<&str>,
    category_id: Option<i64>,
    created_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO listings (title, price, quantity, description, seller_id, category_id, created_at) \
         VALUES (?1, 450.0, 3, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(title)
    .bind(description)
    .bind(seller_id)
    .bind(category_id)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}
