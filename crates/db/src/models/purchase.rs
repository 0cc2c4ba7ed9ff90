//! Purchase model.

use metamind_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `purchases` table: an immutable record granting a buyer
/// access to a product at a captured price.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Purchase {
    pub id: DbId,
    pub buyer_id: DbId,
    pub product_id: DbId,
    /// Product price at confirmation time, in cents.
    pub price_cents: i64,
    /// Gateway payment identifier from the successful confirmation.
    pub payment_id: String,
    pub created_at: Timestamp,
}
