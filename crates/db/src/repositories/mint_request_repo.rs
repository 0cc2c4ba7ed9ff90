//! Repository for the `nft_mint_requests` table.
//!
//! Terminal-state protection is enforced here with guarded updates: the
//! `WHERE status = 'pending'` clause makes a duplicate confirmation
//! delivery affect zero rows, which the service surfaces as a conflict.

use metamind_core::mint::{MINT_STATUS_FAILED, MINT_STATUS_MINTED, MINT_STATUS_PENDING};
use metamind_core::types::DbId;
use sqlx::PgPool;

use crate::models::mint_request::MintRequest;

/// Column list for nft_mint_requests queries.
const COLUMNS: &str = "\
    id, product_id, owner_id, status, txn_hash, metadata_url, created_at, updated_at";

/// Provides creation and guarded status transitions for mint requests.
pub struct MintRequestRepo;

impl MintRequestRepo {
    /// Insert a new request with status `pending` and no transaction hash.
    pub async fn create(
        pool: &PgPool,
        product_id: DbId,
        owner_id: DbId,
    ) -> Result<MintRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO nft_mint_requests (product_id, owner_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MintRequest>(&query)
            .bind(product_id)
            .bind(owner_id)
            .bind(MINT_STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    /// Find a mint request by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MintRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nft_mint_requests WHERE id = $1");
        sqlx::query_as::<_, MintRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all mint requests for an owner, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<MintRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nft_mint_requests
             WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, MintRequest>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Transition a pending request to `minted`, recording the transaction
    /// hash and metadata URL. Returns `None` when the request is not in
    /// `pending` (or does not exist) -- the row is left untouched.
    pub async fn mark_minted(
        pool: &PgPool,
        id: DbId,
        txn_hash: &str,
        metadata_url: &str,
    ) -> Result<Option<MintRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE nft_mint_requests
             SET status = $2, txn_hash = $3, metadata_url = $4, updated_at = now()
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MintRequest>(&query)
            .bind(id)
            .bind(MINT_STATUS_MINTED)
            .bind(txn_hash)
            .bind(metadata_url)
            .bind(MINT_STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// Transition a pending request to `failed`. No transaction hash is
    /// recorded. Returns `None` when the request is not in `pending`.
    pub async fn mark_failed(pool: &PgPool, id: DbId) -> Result<Option<MintRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE nft_mint_requests
             SET status = $2, updated_at = now()
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MintRequest>(&query)
            .bind(id)
            .bind(MINT_STATUS_FAILED)
            .bind(MINT_STATUS_PENDING)
            .fetch_optional(pool)
            .await
    }
}
