//! Product models and DTOs.

use metamind_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ai_products` table: an AI-generated asset for sale.
///
/// Withdrawn products are deactivated (`is_active = false`), never hard
/// deleted -- purchases keep referencing them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    /// Storage key of the content file in the `ai-assets` bucket.
    pub content_key: String,
    pub content_url: String,
    pub preview_key: Option<String>,
    pub preview_url: Option<String>,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a product after draft approval.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub title: String,
    pub description: String,
    pub content_key: String,
    pub content_url: String,
    pub preview_key: Option<String>,
    pub preview_url: Option<String>,
    pub price_cents: i64,
}
