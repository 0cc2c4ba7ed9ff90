//! HTTP client for the generative service.
//!
//! Wraps the service's REST endpoints (content analysis, title
//! suggestion) using [`reqwest`] with a bounded request timeout. The
//! fallible internals are private; the public operations degrade to their
//! deterministic fallbacks instead of surfacing infrastructure errors.

use std::time::Duration;

use metamind_core::text::{self, ContentAnalysis};
use serde::Deserialize;

use crate::titles;

/// Generative service connection settings.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base HTTP URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Request timeout in seconds. Expiry triggers the fallback path
    /// rather than hanging the caller.
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                 |
    /// |-------------------|-------------------------|
    /// | `AI_SERVICE_URL`  | `http://localhost:8000` |
    /// | `AI_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("AI_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            timeout_secs: std::env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Errors from the generative service boundary.
///
/// Only visible to callers that use the fallible internals directly; the
/// public operations swallow these into their fallbacks.
#[derive(Debug, thiserror::Error)]
pub enum AiClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Generative service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Response returned by the `/suggest-titles` endpoint.
#[derive(Debug, Deserialize)]
struct SuggestTitlesResponse {
    suggestions: Vec<String>,
}

/// Client for a single generative service instance.
pub struct AiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AiClient {
    /// Create a new client. The underlying `reqwest::Client` carries the
    /// configured timeout on every request.
    pub fn new(config: AiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base HTTP URL of the service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Structure raw draft text into chapters and a three-part breakdown.
    ///
    /// Primary path is the service's `/analyze-content` endpoint; on any
    /// failure this degrades to [`text::fallback_analysis`], the
    /// guaranteed floor of availability.
    pub async fn analyze_content(&self, content: &str) -> ContentAnalysis {
        match self.try_analyze(content).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "Content analysis degraded to fallback");
                text::fallback_analysis(content)
            }
        }
    }

    /// Generate three title suggestions for the given content.
    ///
    /// On any failure, returns the canned category-keyed list from
    /// [`titles::fallback_suggestions`].
    pub async fn suggest_titles(&self, content: &str, category: Option<&str>) -> Vec<String> {
        match self.try_suggest_titles(content, category).await {
            Ok(suggestions) if !suggestions.is_empty() => suggestions,
            Ok(_) => titles::fallback_suggestions(category),
            Err(e) => {
                tracing::warn!(error = %e, "Title suggestion degraded to fallback");
                titles::fallback_suggestions(category)
            }
        }
    }

    async fn try_analyze(&self, content: &str) -> Result<ContentAnalysis, AiClientError> {
        let body = serde_json::json!({ "content": content });
        let response = self
            .client
            .post(format!("{}/analyze-content", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn try_suggest_titles(
        &self,
        content: &str,
        category: Option<&str>,
    ) -> Result<Vec<String>, AiClientError> {
        let body = serde_json::json!({ "content": content, "category": category });
        let response = self
            .client
            .post(format!("{}/suggest-titles", self.base_url))
            .json(&body)
            .send()
            .await?;

        let parsed: SuggestTitlesResponse = Self::parse_response(response).await?;
        Ok(parsed.suggestions)
    }

    // ---- private helpers ----

    /// Parse a successful JSON response body into the expected type, or
    /// capture the status and body text on failure.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AiClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> AiClient {
        // Port 9 (discard) is never serving; connections fail immediately.
        AiClient::new(AiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        })
    }

    #[tokio::test]
    async fn analysis_degrades_to_fallback_when_unreachable() {
        let client = unreachable_client();
        let analysis = client.analyze_content("one two three four").await;

        assert_eq!(
            analysis.chapters,
            vec!["Introduction", "Main Content", "Conclusion"]
        );
        assert_eq!(analysis.structure.body, "one two three four");
        assert_eq!(analysis.word_count, 4);
        assert_eq!(analysis.estimated_reading_minutes, 1);
    }

    #[tokio::test]
    async fn title_suggestions_degrade_to_canned_list() {
        let client = unreachable_client();
        let suggestions = client.suggest_titles("my story", Some("business")).await;

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0], "Entrepreneurial Wisdom: Lessons Learned");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = AiClient::new(AiConfig {
            base_url: "http://localhost:8000/".into(),
            timeout_secs: 30,
        });
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
