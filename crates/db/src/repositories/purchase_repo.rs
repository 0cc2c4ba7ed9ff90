//! Repository for the `purchases` table.
//!
//! Purchase rows are write-once: created only after a successful payment
//! confirmation, never updated or deleted through normal flow.

use metamind_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchase::Purchase;

/// Column list for purchases queries.
const COLUMNS: &str = "id, buyer_id, product_id, price_cents, payment_id, created_at";

/// Provides insert and read operations for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Insert a purchase, capturing the product price at this moment.
    pub async fn create(
        pool: &PgPool,
        buyer_id: DbId,
        product_id: DbId,
        price_cents: i64,
        payment_id: &str,
    ) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases (buyer_id, product_id, price_cents, payment_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(buyer_id)
            .bind(product_id)
            .bind(price_cents)
            .bind(payment_id)
            .fetch_one(pool)
            .await
    }

    /// List a buyer's purchases, newest first.
    pub async fn list_for_buyer(
        pool: &PgPool,
        buyer_id: DbId,
    ) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases WHERE buyer_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(buyer_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the buyer already purchased the product.
    pub async fn exists_for_buyer_and_product(
        pool: &PgPool,
        buyer_id: DbId,
        product_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM purchases WHERE buyer_id = $1 AND product_id = $2",
        )
        .bind(buyer_id)
        .bind(product_id)
        .fetch_one(pool)
        .await?;
        Ok(count.0 > 0)
    }
}
