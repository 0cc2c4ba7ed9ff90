//! Upload validation and storage-key naming.
//!
//! Every binary upload (content files, preview images, avatars) passes
//! through [`UploadContext::validate`] before it touches object storage:
//! the declared MIME type is checked against the bucket's allow-list, the
//! byte size against the bucket's ceiling, and a deterministic storage key
//! of the form `folder/<token>.<ext>` is built. The token is drawn fresh
//! per call and never reused.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Bucket constants
// ---------------------------------------------------------------------------

/// Bucket holding product content files and their `previews/` sub-scope.
pub const BUCKET_AI_ASSETS: &str = "ai-assets";

/// Bucket holding user avatar images.
pub const BUCKET_USER_AVATARS: &str = "user-avatars";

/// Bucket holding NFT metadata documents.
pub const BUCKET_NFT_METADATA: &str = "nft-metadata";

/// Folder scope for preview images inside [`BUCKET_AI_ASSETS`].
pub const FOLDER_PREVIEWS: &str = "previews";

/// Folder scope for uploads not yet attached to a product. Orphaned `temp`
/// objects are reclaimed by an external garbage-collection process.
pub const FOLDER_TEMP: &str = "temp";

/// MIME types accepted for product content files.
pub const CONTENT_ASSET_TYPES: &[&str] = &[
    "image/*",
    "application/pdf",
    "audio/mpeg",
    "audio/wav",
    "video/mp4",
    "video/webm",
];

/// MIME types accepted for preview images and avatars.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Size ceiling for product content files (50 MiB).
pub const MAX_CONTENT_ASSET_BYTES: u64 = 50 * 1024 * 1024;

/// Size ceiling for preview images and avatars (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Length of the random storage-key token. 12 alphanumeric characters carry
/// ~71 bits of entropy, comfortably above the 36-bit collision floor.
const TOKEN_LEN: usize = 12;

// ---------------------------------------------------------------------------
// Upload context
// ---------------------------------------------------------------------------

/// Validation rules and destination for one class of binary upload.
#[derive(Debug, Clone)]
pub struct UploadContext {
    /// Destination bucket.
    pub bucket: &'static str,
    /// Destination folder. When `None`, the authenticated actor's id is used.
    pub folder: Option<String>,
    /// MIME allow-list. `image/*` matches any image subtype.
    pub allowed_types: &'static [&'static str],
    /// Maximum accepted size in bytes.
    pub max_size_bytes: u64,
}

/// A successfully validated upload, ready for the storage gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Destination bucket.
    pub bucket: &'static str,
    /// Full storage key, `folder/<token>.<ext>`.
    pub storage_key: String,
    /// The declared MIME type, forwarded to the storage backend.
    pub content_type: String,
}

impl UploadContext {
    /// Context for product content files.
    pub fn content_asset() -> Self {
        Self {
            bucket: BUCKET_AI_ASSETS,
            folder: None,
            allowed_types: CONTENT_ASSET_TYPES,
            max_size_bytes: MAX_CONTENT_ASSET_BYTES,
        }
    }

    /// Context for product preview images (stored under `previews/`).
    pub fn preview_image() -> Self {
        Self {
            bucket: BUCKET_AI_ASSETS,
            folder: Some(FOLDER_PREVIEWS.to_string()),
            allowed_types: IMAGE_TYPES,
            max_size_bytes: MAX_IMAGE_BYTES,
        }
    }

    /// Context for user avatar images.
    pub fn avatar() -> Self {
        Self {
            bucket: BUCKET_USER_AVATARS,
            folder: None,
            allowed_types: IMAGE_TYPES,
            max_size_bytes: MAX_IMAGE_BYTES,
        }
    }

    /// Override the destination folder.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Validate a declared MIME type and byte size against this context.
    ///
    /// On success, builds the storage key `folder/<token>.<ext>`, where the
    /// folder defaults to `actor_id` when the context has none and the token
    /// is freshly generated per call.
    pub fn validate(
        &self,
        declared_type: &str,
        size_bytes: u64,
        actor_id: DbId,
    ) -> Result<ValidatedUpload, CoreError> {
        if !type_allowed(self.allowed_types, declared_type) {
            return Err(CoreError::Validation(format!(
                "File type '{declared_type}' not allowed"
            )));
        }

        if size_bytes > self.max_size_bytes {
            return Err(CoreError::Validation(format!(
                "File size {size_bytes} exceeds {} bytes",
                self.max_size_bytes
            )));
        }

        let folder = self
            .folder
            .clone()
            .unwrap_or_else(|| actor_id.to_string());
        let storage_key = format!(
            "{folder}/{}.{}",
            storage_token(),
            extension_for(declared_type)
        );

        Ok(ValidatedUpload {
            bucket: self.bucket,
            storage_key,
            content_type: declared_type.to_string(),
        })
    }
}

/// Check a declared MIME type against an allow-list entry-by-entry.
///
/// An entry of the form `type/*` matches any subtype of `type`.
fn type_allowed(allowed: &[&str], declared: &str) -> bool {
    allowed.iter().any(|entry| match entry.strip_suffix("/*") {
        Some(top_level) => declared
            .split_once('/')
            .is_some_and(|(t, _)| t == top_level),
        None => *entry == declared,
    })
}

/// File extension for a declared MIME type.
///
/// Common types map to their conventional extension; anything else falls
/// back to the raw subtype.
fn extension_for(declared: &str) -> String {
    match declared {
        "image/jpeg" => "jpg".to_string(),
        "audio/mpeg" => "mp3".to_string(),
        "audio/wav" => "wav".to_string(),
        other => other
            .split_once('/')
            .map(|(_, subtype)| subtype.to_string())
            .unwrap_or_else(|| "bin".to_string()),
    }
}

/// Generate a fresh alphanumeric storage-key token.
fn storage_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_rejected_by_image_allow_list() {
        let result = UploadContext::preview_image().validate("application/zip", 1024, 7);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn oversized_file_rejected() {
        // 6 MiB against the 5 MiB preview ceiling.
        let result =
            UploadContext::preview_image().validate("image/png", 6 * 1024 * 1024, 7);
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn png_within_ceiling_accepted_with_png_key() {
        let validated = UploadContext::preview_image()
            .validate("image/png", 4 * 1024 * 1024, 7)
            .unwrap();

        assert_eq!(validated.bucket, BUCKET_AI_ASSETS);
        assert_eq!(validated.content_type, "image/png");

        let (folder, file) = validated.storage_key.split_once('/').unwrap();
        assert_eq!(folder, "previews");
        let token = file.strip_suffix(".png").unwrap();
        assert_eq!(token.len(), 12);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn folder_defaults_to_actor_id() {
        let validated = UploadContext::avatar()
            .validate("image/webp", 1024, 91)
            .unwrap();
        assert!(validated.storage_key.starts_with("91/"));
        assert!(validated.storage_key.ends_with(".webp"));
    }

    #[test]
    fn folder_override_wins() {
        let validated = UploadContext::content_asset()
            .with_folder(FOLDER_TEMP)
            .validate("application/pdf", 1024, 91)
            .unwrap();
        assert!(validated.storage_key.starts_with("temp/"));
        assert!(validated.storage_key.ends_with(".pdf"));
    }

    #[test]
    fn image_wildcard_matches_any_subtype() {
        let ctx = UploadContext::content_asset();
        assert!(ctx.validate("image/gif", 1024, 1).is_ok());
        assert!(ctx.validate("image/tiff", 1024, 1).is_ok());
        // Wildcard is scoped to the image top-level type.
        assert!(ctx.validate("application/zip", 1024, 1).is_err());
    }

    #[test]
    fn content_asset_ceiling_is_50_mib() {
        let ctx = UploadContext::content_asset();
        assert!(ctx.validate("video/mp4", 50 * 1024 * 1024, 1).is_ok());
        assert!(ctx.validate("video/mp4", 50 * 1024 * 1024 + 1, 1).is_err());
    }

    #[test]
    fn jpeg_and_mpeg_extensions_are_conventional() {
        let v = UploadContext::avatar().validate("image/jpeg", 10, 1).unwrap();
        assert!(v.storage_key.ends_with(".jpg"));

        let v = UploadContext::content_asset()
            .validate("audio/mpeg", 10, 1)
            .unwrap();
        assert!(v.storage_key.ends_with(".mp3"));
    }

    #[test]
    fn tokens_differ_between_calls() {
        let ctx = UploadContext::avatar();
        let a = ctx.validate("image/png", 10, 1).unwrap();
        let b = ctx.validate("image/png", 10, 1).unwrap();
        assert_ne!(a.storage_key, b.storage_key);
    }
}
