//! Startup schema evolution for the catalog database.
//!
//! The catalog may be a fresh file, a current one, or a snapshot produced by
//! an older build. Every step below is additive and idempotent, so the whole
//! pass is safe to run on every start. A failed step is logged and skipped;
//! a failed pass is logged and the process keeps serving with whatever
//! schema state resulted.

use sqlx::sqlite::SqliteConnection;
use sqlx::{Row, SqlitePool};

use crate::features::users::models::{ROLE_LEGACY_PRODUCER, ROLE_SELLER};
use crate::shared::constants::DEFAULT_CATEGORIES;

const CREATE_USERS: &str = "\
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'buyer',
        store_name TEXT,
        store_location TEXT,
        store_city TEXT,
        store_latitude REAL,
        store_longitude REAL,
        store_address TEXT,
        store_image TEXT
    )";

const CREATE_CATEGORIES: &str = "\
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        slug TEXT NOT NULL UNIQUE
    )";

const CREATE_LISTINGS: &str = "\
    CREATE TABLE IF NOT EXISTS listings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        price REAL NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        description TEXT,
        image_ref TEXT,
        seller_id INTEGER NOT NULL REFERENCES users(id),
        category_id INTEGER REFERENCES categories(id),
        created_at TEXT NOT NULL
    )";

const CREATE_REVIEWS: &str = "\
    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        store_owner_id INTEGER NOT NULL REFERENCES users(id),
        reviewer_id INTEGER NOT NULL REFERENCES users(id),
        rating INTEGER NOT NULL,
        review_text TEXT,
        created_at TEXT NOT NULL
    )";

/// One review per (store owner, reviewer); the upsert's ON CONFLICT target.
const CREATE_REVIEWS_UNIQUE_INDEX: &str = "\
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reviews_store_reviewer
    ON reviews (store_owner_id, reviewer_id)";

const CREATE_LISTINGS_CATEGORY_INDEX: &str = "\
    CREATE INDEX IF NOT EXISTS idx_listings_category
    ON listings (category_id)";

pub struct SchemaEvolution {
    pool: SqlitePool,
}

impl SchemaEvolution {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run the evolution pass. Must complete before the listener is bound so
    /// no request observes a half-migrated schema. Never fatal: the
    /// application starts even on a partially migrated or foreign database.
    pub async fn run(&self) {
        match self.apply().await {
            Ok(()) => tracing::info!("Schema evolution completed"),
            Err(e) => tracing::warn!(
                "Schema evolution did not complete: {e}; continuing with current schema state"
            ),
        }
    }

    /// All steps execute on one connection inside one transaction, in order.
    /// A failed step is logged and skipped; the remaining steps still run.
    async fn apply(&self) -> sqlx::Result<()> {
        let mut tx = self.pool.begin().await?;

        if let Err(e) = create_base_tables(&mut tx).await {
            warn_skipped("create base tables", &e);
        }
        if let Err(e) = add_store_geo_columns(&mut tx).await {
            warn_skipped("add store geo columns", &e);
        }
        if let Err(e) = rewrite_legacy_roles(&mut tx).await {
            warn_skipped("rewrite legacy roles", &e);
        }
        if let Err(e) = seed_categories_if_empty(&mut tx).await {
            warn_skipped("seed default categories", &e);
        }
        if let Err(e) = add_listing_category_column(&mut tx).await {
            warn_skipped("add listing category column", &e);
        }

        tx.commit().await
    }
}

fn warn_skipped(step: &str, e: &sqlx::Error) {
    tracing::warn!("Schema evolution step '{step}' failed, skipping: {e}");
}

/// A fresh database boots straight to the current schema; on an existing one
/// every statement here is a no-op.
async fn create_base_tables(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    for ddl in [
        CREATE_USERS,
        CREATE_CATEGORIES,
        CREATE_LISTINGS,
        CREATE_REVIEWS,
        CREATE_REVIEWS_UNIQUE_INDEX,
        CREATE_LISTINGS_CATEGORY_INDEX,
    ] {
        sqlx::query(ddl).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Older catalogs predate the store location picker.
async fn add_store_geo_columns(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    add_column_if_missing(conn, "users", "store_latitude", "REAL").await?;
    add_column_if_missing(conn, "users", "store_longitude", "REAL").await?;
    add_column_if_missing(conn, "users", "store_address", "TEXT").await?;
    Ok(())
}

/// The seller role used to be labelled 'producer'.
async fn rewrite_legacy_roles(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    let result = sqlx::query("UPDATE users SET role = ?1 WHERE role = ?2")
        .bind(ROLE_SELLER)
        .bind(ROLE_LEGACY_PRODUCER)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() > 0 {
        tracing::info!(
            "Rewrote {} legacy 'producer' role(s) to 'seller'",
            result.rows_affected()
        );
    }
    Ok(())
}

/// Seed the fixed default category set into an empty dictionary. Individual
/// insert failures (e.g. uniqueness races) are skipped without aborting the
/// rest of the seed.
async fn seed_categories_if_empty(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *conn)
        .await?;
    if count > 0 {
        return Ok(());
    }

    for (name, slug) in DEFAULT_CATEGORIES {
        if let Err(e) = sqlx::query("INSERT INTO categories (name, slug) VALUES (?1, ?2)")
            .bind(*name)
            .bind(*slug)
            .execute(&mut *conn)
            .await
        {
            tracing::warn!("Skipping seed of category '{name}': {e}");
        }
    }
    tracing::info!("Seeded default categories");
    Ok(())
}

async fn add_listing_category_column(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    add_column_if_missing(conn, "listings", "category_id", "INTEGER REFERENCES categories(id)")
        .await
}

async fn has_column(conn: &mut SqliteConnection, table: &str, column: &str) -> sqlx::Result<bool> {
    // Table names here are internal constants, never user input.
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.iter().any(|row| row.get::<String, _>("name") == column))
}

async fn add_column_if_missing(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    declaration: &str,
) -> sqlx::Result<()> {
    if !has_column(conn, table, column).await? {
        sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} {declaration}"))
            .execute(&mut *conn)
            .await?;
        tracing::info!("Added column: {table}.{column}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn bare_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap()
    }

    async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
        sqlx::query(&format!("PRAGMA table_info({table})"))
            .fetch_all(pool)
            .await
            .unwrap()
            .iter()
            .map(|row| row.get::<String, _>("name"))
            .collect()
    }

    #[tokio::test]
    async fn fresh_database_gets_current_schema() {
        let pool = bare_pool().await;
        SchemaEvolution::new(pool.clone()).run().await;

        let users = column_names(&pool, "users").await;
        for col in ["store_latitude", "store_longitude", "store_address"] {
            assert!(users.contains(&col.to_string()), "missing users.{col}");
        }
        let listings = column_names(&pool, "listings").await;
        assert!(listings.contains(&"category_id".to_string()));

        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(categories, 8);
    }

    #[tokio::test]
    async fn upgrades_legacy_snapshot_without_losing_rows() {
        let pool = bare_pool().await;

        // Schema shape from before the location picker and categories existed
        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL DEFAULT 'buyer',
                store_name TEXT,
                store_location TEXT,
                store_city TEXT,
                store_image TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TABLE listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1,
                description TEXT,
                image_ref TEXT,
                seller_id INTEGER NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO users (username, email, role, store_name) \
             VALUES ('Maria', 'maria@example.com', 'producer', 'Maria''s Catch')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO listings (title, price, seller_id, created_at) \
             VALUES ('Dried bombil', 120.0, 1, '2024-01-01 00:00:00')",
        )
        .execute(&pool)
        .await
        .unwrap();

        SchemaEvolution::new(pool.clone()).run().await;

        let users = column_names(&pool, "users").await;
        assert!(users.contains(&"store_latitude".to_string()));
        let listings = column_names(&pool, "listings").await;
        assert!(listings.contains(&"category_id".to_string()));

        let role: String = sqlx::query_scalar("SELECT role FROM users WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(role, "seller");

        let listing_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(listing_count, 1);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let pool = bare_pool().await;
        SchemaEvolution::new(pool.clone()).run().await;

        sqlx::query("INSERT INTO users (username, email) VALUES ('Ana', 'ana@example.com')")
            .execute(&pool)
            .await
            .unwrap();

        let users_before = column_names(&pool, "users").await;
        SchemaEvolution::new(pool.clone()).run().await;
        let users_after = column_names(&pool, "users").await;
        assert_eq!(users_before, users_after);

        // Seed does not duplicate, rows survive
        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(categories, 8);
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }
}
