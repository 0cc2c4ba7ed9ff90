//! Repository for the `ai_products` table.

use metamind_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{CreateProduct, Product};

/// Column list for ai_products queries.
const COLUMNS: &str = "\
    id, owner_id, title, description, content_key, content_url, \
    preview_key, preview_url, price_cents, is_active, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new active product for an owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProduct,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_products (\
                owner_id, title, description, content_key, content_url, \
                preview_key, preview_url, price_cents\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content_key)
            .bind(&input.content_url)
            .bind(input.preview_key.as_deref())
            .bind(input.preview_url.as_deref())
            .bind(input.price_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by id, scoped to its owner.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_products WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List active products, newest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_products WHERE is_active ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    /// List all products belonging to an owner, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_products WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a product (withdrawn products are never hard-deleted).
    /// Returns the updated row, or `None` if the id does not exist.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_products SET is_active = FALSE, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether any active product title matches `candidate`
    /// case-insensitively, exactly or as a prefix.
    pub async fn active_title_exists(
        pool: &PgPool,
        candidate: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM ai_products
             WHERE is_active AND title ILIKE $1 || '%'",
        )
        .bind(candidate)
        .fetch_one(pool)
        .await?;
        Ok(count.0 > 0)
    }
}
