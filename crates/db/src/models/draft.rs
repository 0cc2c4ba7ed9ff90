//! Draft models and DTOs.
//!
//! A draft is an immutable, versioned snapshot of a creator's written
//! idea. A save always creates a new row; there is no update DTO.

use metamind_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A draft row from the `drafts` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Draft {
    pub id: DbId,
    pub owner_id: DbId,
    /// Strictly increasing per owner, seeded at 1. Never reused.
    pub version: i32,
    pub content: String,
    pub title: Option<String>,
    pub chapters: Vec<String>,
    pub word_count: i32,
    pub created_at: Timestamp,
}

/// Input for saving a new draft version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDraft {
    pub content: String,
    pub title: Option<String>,
    pub chapters: Option<Vec<String>>,
    /// Computed from `content` with the whitespace-token rule when absent.
    pub word_count: Option<i32>,
}
