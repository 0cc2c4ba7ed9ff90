//! Repository for the `drafts` table.

use metamind_core::types::DbId;
use sqlx::PgPool;

use crate::models::draft::Draft;

/// Column list for drafts queries.
const COLUMNS: &str = "id, owner_id, version, content, title, chapters, word_count, created_at";

/// Provides versioned insert, listing, and deletion for drafts.
pub struct DraftRepo;

impl DraftRepo {
    /// Insert a new draft, assigning the next version number for the owner
    /// in the same statement.
    ///
    /// Under concurrent saves by one owner, two inserts can compute the
    /// same version; the `uq_drafts_owner_version` constraint rejects one
    /// with a unique violation and the caller retries.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        content: &str,
        title: Option<&str>,
        chapters: &[String],
        word_count: i32,
    ) -> Result<Draft, sqlx::Error> {
        let query = format!(
            "INSERT INTO drafts (owner_id, version, content, title, chapters, word_count)
             VALUES ($1,
                     COALESCE((SELECT MAX(version) FROM drafts WHERE owner_id = $1), 0) + 1,
                     $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(owner_id)
            .bind(content)
            .bind(title)
            .bind(chapters)
            .bind(word_count)
            .fetch_one(pool)
            .await
    }

    /// Find a draft by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Draft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drafts WHERE id = $1");
        sqlx::query_as::<_, Draft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all drafts for an owner, most recent version first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Draft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM drafts WHERE owner_id = $1 ORDER BY version DESC"
        );
        sqlx::query_as::<_, Draft>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a draft by id. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drafts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Highest version currently assigned to an owner (0 if none).
    pub async fn max_version(pool: &PgPool, owner_id: DbId) -> Result<i32, sqlx::Error> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(version) FROM drafts WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0.unwrap_or(0))
    }
}
