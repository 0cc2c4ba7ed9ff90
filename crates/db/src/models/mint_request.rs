//! Mint request model.
//!
//! Status values and the transition rules live in
//! [`metamind_core::mint`]; the repository enforces them with guarded
//! updates (`WHERE status = 'pending'`).

use metamind_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `nft_mint_requests` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MintRequest {
    pub id: DbId,
    pub product_id: DbId,
    pub owner_id: DbId,
    /// One of `pending`, `minted`, `failed`.
    pub status: String,
    /// Present only once the request reaches `minted`.
    pub txn_hash: Option<String>,
    pub metadata_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
