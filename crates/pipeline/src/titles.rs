//! Title resolution: advisory uniqueness plus suggestions.
//!
//! Uniqueness is checked, not enforced -- a creator may still publish a
//! colliding title. Both operations prefer availability over correctness:
//! an infrastructure fault never blocks publication.

use std::sync::Arc;

use metamind_ai::AiClient;
use metamind_db::repositories::ProductRepo;
use metamind_db::DbPool;
use serde::Serialize;

/// Result of an advisory title check.
#[derive(Debug, Clone, Serialize)]
pub struct TitleCheck {
    pub is_unique: bool,
    /// Proposed alternative, present only when the candidate collides.
    pub suggested: Option<String>,
}

/// Alternative proposed for a colliding title.
pub fn revised_suggestion(candidate: &str) -> String {
    format!("{candidate} - Revised Edition")
}

/// Checks titles against active products and proposes alternatives.
pub struct TitleResolver {
    pool: DbPool,
    ai: Arc<AiClient>,
}

impl TitleResolver {
    pub fn new(pool: DbPool, ai: Arc<AiClient>) -> Self {
        Self { pool, ai }
    }

    /// Check a candidate title against active products.
    ///
    /// A case-insensitive exact or prefix match yields `is_unique = false`
    /// with a suggested alternative. A query failure degrades to
    /// `is_unique = true` -- availability over strict uniqueness.
    pub async fn check_title(&self, candidate: &str) -> TitleCheck {
        match ProductRepo::active_title_exists(&self.pool, candidate).await {
            Ok(true) => TitleCheck {
                is_unique: false,
                suggested: Some(revised_suggestion(candidate)),
            },
            Ok(false) => TitleCheck {
                is_unique: true,
                suggested: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Title check degraded; allowing candidate");
                TitleCheck {
                    is_unique: true,
                    suggested: None,
                }
            }
        }
    }

    /// Generate three title suggestions for the given content.
    ///
    /// Falls back to the canned category lists on any generation failure.
    pub async fn suggest_titles(&self, content: &str, category: Option<&str>) -> Vec<String> {
        self.ai.suggest_titles(content, category).await
    }
}

#[cfg(test)]
mod tests {
    use metamind_ai::AiConfig;

    use super::*;

    fn resolver() -> TitleResolver {
        let pool = metamind_db::create_lazy_pool("postgres://127.0.0.1:1/unreachable").unwrap();
        let ai = Arc::new(AiClient::new(AiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        }));
        TitleResolver::new(pool, ai)
    }

    #[test]
    fn revised_suggestion_preserves_candidate_case() {
        assert_eq!(
            revised_suggestion("sleep hacks"),
            "sleep hacks - Revised Edition"
        );
    }

    #[tokio::test]
    async fn check_degrades_to_unique_when_store_unreachable() {
        let check = resolver().check_title("Sleep Hacks").await;
        assert!(check.is_unique);
        assert!(check.suggested.is_none());
    }

    #[tokio::test]
    async fn suggestions_fall_back_when_service_unreachable() {
        let suggestions = resolver().suggest_titles("my story", Some("medical")).await;
        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions[0],
            "Healing Wisdom: A Medical Professional's Journey"
        );
    }
}
