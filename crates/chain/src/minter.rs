//! Pluggable mint submission interface.
//!
//! Minting itself happens in an external worker holding the minter
//! wallet; this crate only defines the boundary. A submission is
//! fire-and-forget -- the eventual [`MintConfirmation`] arrives out of
//! band (webhook or queue consumer) and is applied to the mint request
//! state machine exactly once.

use async_trait::async_trait;
use metamind_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::metadata::NftMetadata;
use crate::rpc::ChainError;

/// Outcome reported by the external confirmation callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MintConfirmation {
    /// The transaction confirmed; both fields are always present.
    Minted {
        txn_hash: String,
        metadata_url: String,
    },
    /// The mint failed; no transaction hash exists.
    Failed,
}

/// Boundary to the minting backend.
#[async_trait]
pub trait MintSubmitter: Send + Sync {
    /// Queue a mint for the given request and metadata document.
    ///
    /// Returning `Ok` only means the submission was accepted; completion
    /// is reported later as a [`MintConfirmation`].
    async fn submit(&self, request_id: DbId, metadata: &NftMetadata) -> Result<(), ChainError>;
}

/// Submitter posting mints to the external minting worker over HTTP.
pub struct HttpMintSubmitter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMintSubmitter {
    /// * `base_url` - minting worker base URL, e.g. `http://localhost:7000`.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MintSubmitter for HttpMintSubmitter {
    async fn submit(&self, request_id: DbId, metadata: &NftMetadata) -> Result<(), ChainError> {
        let body = serde_json::json!({
            "requestId": request_id,
            "metadata": metadata,
        });

        let response = self
            .client
            .post(format!("{}/mint", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Rpc {
                code: status.as_u16() as i64,
                message: "Mint submission rejected".into(),
            });
        }

        tracing::info!(request_id, "Mint submission accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_confirmation_parses_from_callback_payload() {
        let confirmation: MintConfirmation = serde_json::from_str(
            r#"{"status": "minted", "txn_hash": "0xabc", "metadata_url": "ipfs://cid"}"#,
        )
        .unwrap();

        match confirmation {
            MintConfirmation::Minted {
                txn_hash,
                metadata_url,
            } => {
                assert_eq!(txn_hash, "0xabc");
                assert_eq!(metadata_url, "ipfs://cid");
            }
            MintConfirmation::Failed => panic!("expected minted"),
        }
    }

    #[test]
    fn failed_confirmation_carries_no_hash() {
        let confirmation: MintConfirmation =
            serde_json::from_str(r#"{"status": "failed"}"#).unwrap();
        assert!(matches!(confirmation, MintConfirmation::Failed));
    }
}
