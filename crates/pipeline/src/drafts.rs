//! Draft version store orchestration.
//!
//! A save always creates a new immutable row with the next version number
//! for the owner. The version-assigning insert and the unique constraint
//! on `(owner_id, version)` form the serialization point; on a unique
//! violation from a concurrent save this service retries a bounded number
//! of times.

use metamind_core::error::CoreError;
use metamind_core::text;
use metamind_core::types::{Actor, DbId};
use metamind_db::models::draft::{CreateDraft, Draft};
use metamind_db::repositories::DraftRepo;
use metamind_db::{is_unique_violation, DbPool};

use crate::infra;

/// Attempts before a concurrent-save conflict is surfaced.
const VERSION_RETRY_ATTEMPTS: u32 = 3;

/// Saves, lists, and deletes draft versions.
pub struct DraftService {
    pool: DbPool,
}

impl DraftService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a new draft version for the actor.
    ///
    /// When the caller omits `word_count`, it is computed with the same
    /// whitespace-token rule the content analyzer's fallback uses.
    pub async fn save(&self, actor: Actor, input: CreateDraft) -> Result<Draft, CoreError> {
        if input.content.is_empty() {
            return Err(CoreError::Validation("Draft content must not be empty".into()));
        }

        let word_count = input
            .word_count
            .unwrap_or_else(|| text::word_count(&input.content) as i32);
        if word_count < 0 {
            return Err(CoreError::Validation("word_count must be non-negative".into()));
        }
        let chapters = input.chapters.clone().unwrap_or_default();

        let mut attempt = 0;
        loop {
            match DraftRepo::create(
                &self.pool,
                actor.id,
                &input.content,
                input.title.as_deref(),
                &chapters,
                word_count,
            )
            .await
            {
                Ok(draft) => {
                    tracing::debug!(
                        owner_id = actor.id,
                        version = draft.version,
                        "Draft version saved"
                    );
                    return Ok(draft);
                }
                Err(e) if is_unique_violation(&e) => {
                    attempt += 1;
                    if attempt >= VERSION_RETRY_ATTEMPTS {
                        return Err(CoreError::Conflict(
                            "Concurrent saves exhausted version retries".into(),
                        ));
                    }
                    tracing::debug!(owner_id = actor.id, attempt, "Version conflict, retrying");
                }
                Err(e) => return Err(infra(e)),
            }
        }
    }

    /// List the actor's drafts, most recent version first.
    pub async fn list(&self, actor: Actor) -> Result<Vec<Draft>, CoreError> {
        DraftRepo::list_for_owner(&self.pool, actor.id)
            .await
            .map_err(infra)
    }

    /// Delete one draft by id.
    ///
    /// Only the owner may delete; deleting a missing id is a
    /// [`CoreError::NotFound`]. Versions of deleted drafts are never
    /// reassigned.
    pub async fn delete(&self, actor: Actor, id: DbId) -> Result<(), CoreError> {
        let draft = DraftRepo::find_by_id(&self.pool, id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("draft", id))?;

        if draft.owner_id != actor.id {
            return Err(CoreError::Forbidden(
                "Drafts can only be deleted by their owner".into(),
            ));
        }

        let deleted = DraftRepo::delete(&self.pool, id).await.map_err(infra)?;
        if !deleted {
            return Err(CoreError::not_found("draft", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pool pointed at a port nothing listens on; first use fails fast.
    fn unreachable_pool() -> DbPool {
        metamind_db::create_lazy_pool("postgres://127.0.0.1:1/unreachable").unwrap()
    }

    fn service() -> DraftService {
        DraftService::new(unreachable_pool())
    }

    fn input(content: &str, word_count: Option<i32>) -> CreateDraft {
        CreateDraft {
            content: content.into(),
            title: None,
            chapters: None,
            word_count,
        }
    }

    #[tokio::test]
    async fn empty_content_is_rejected_before_any_io() {
        let result = service().save(Actor::new(1), input("", None)).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn negative_word_count_is_rejected() {
        let result = service().save(Actor::new(1), input("hello", Some(-1))).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn unreachable_store_surfaces_infrastructure_error() {
        // Writes never degrade silently: the save must fail loudly.
        let result = service().save(Actor::new(1), input("hello world", None)).await;
        assert!(matches!(result, Err(CoreError::Infrastructure(_))));
    }
}
