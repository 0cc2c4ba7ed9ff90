//! NFT metadata documents and resolution.
//!
//! Token URIs come in two shapes: direct HTTP(S) URLs, fetched as-is, and
//! `ipfs://` URIs, rewritten to a public gateway URL before fetching.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rpc::ChainError;

/// Public IPFS gateway used to resolve `ipfs://` URIs.
pub const IPFS_GATEWAY_BASE: &str = "https://ipfs.io/ipfs/";

/// Rewrite a token URI into a fetchable URL.
///
/// `ipfs://<cid>` becomes `https://ipfs.io/ipfs/<cid>`; anything else is
/// returned unchanged.
pub fn resolve_metadata_url(token_uri: &str) -> String {
    match token_uri.strip_prefix("ipfs://") {
        Some(cid) => format!("{IPFS_GATEWAY_BASE}{cid}"),
        None => token_uri.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Metadata document
// ---------------------------------------------------------------------------

/// A single trait entry in an NFT metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

/// The metadata document submitted alongside a mint and resolved back
/// from `tokenURI`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    /// Public URL of the preview image.
    pub image: Option<String>,
    pub external_url: Option<String>,
    #[serde(default)]
    pub attributes: Vec<NftAttribute>,
}

impl NftMetadata {
    /// Create a document with the required fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: None,
            external_url: None,
            attributes: Vec::new(),
        }
    }

    /// Set the preview image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the external product page URL.
    pub fn with_external_url(mut self, url: impl Into<String>) -> Self {
        self.external_url = Some(url.into());
        self
    }

    /// Append a trait entry.
    pub fn with_attribute(mut self, trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(NftAttribute {
            trait_type: trait_type.into(),
            value: value.into(),
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Fetches metadata documents from resolved token URIs.
pub struct MetadataFetcher {
    client: reqwest::Client,
}

impl MetadataFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Resolve and fetch the metadata document behind a token URI.
    pub async fn fetch(&self, token_uri: &str) -> Result<NftMetadata, ChainError> {
        let url = resolve_metadata_url(token_uri);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Rpc {
                code: status.as_u16() as i64,
                message: format!("Metadata fetch failed for {url}"),
            });
        }

        Ok(response.json::<NftMetadata>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipfs_uri_rewrites_to_public_gateway() {
        assert_eq!(
            resolve_metadata_url("ipfs://abc123"),
            "https://ipfs.io/ipfs/abc123"
        );
    }

    #[test]
    fn http_url_passes_through_unchanged() {
        assert_eq!(
            resolve_metadata_url("https://example.com/meta/1.json"),
            "https://example.com/meta/1.json"
        );
    }

    #[test]
    fn builder_accumulates_attributes() {
        let metadata = NftMetadata::new("Sleep Hacks", "A guide to better sleep")
            .with_image("https://cdn.example.com/previews/abc.png")
            .with_external_url("https://metamind.app/product/42")
            .with_attribute("Category", "Knowledge")
            .with_attribute("Creator", "ada");

        assert_eq!(metadata.name, "Sleep Hacks");
        assert_eq!(metadata.attributes.len(), 2);
        assert_eq!(metadata.attributes[1].trait_type, "Creator");
        assert_eq!(metadata.attributes[1].value, "ada");
    }

    #[test]
    fn metadata_deserializes_without_attributes() {
        let doc: NftMetadata = serde_json::from_str(
            r#"{"name": "X", "description": "Y", "image": null, "external_url": null}"#,
        )
        .unwrap();
        assert!(doc.attributes.is_empty());
    }
}
