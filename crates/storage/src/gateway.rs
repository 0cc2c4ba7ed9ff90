//! Object-storage trait and error types.

use async_trait::async_trait;
use metamind_core::error::CoreError;
use serde::Serialize;

/// A durable reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub bucket: String,
    /// Full key inside the bucket, `folder/<token>.<ext>`.
    pub storage_key: String,
    /// Public URL the object is served from.
    pub public_url: String,
}

/// Errors from the object-storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend rejected or lost a write (network, quota, permission).
    #[error("Storage write failed: {0}")]
    Write(String),

    /// The backend rejected a delete.
    #[error("Storage delete failed: {0}")]
    Delete(String),

    /// The caller abandoned the upload before it completed. The object
    /// does not exist at its computed key.
    #[error("Upload cancelled before completion")]
    Cancelled,
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Infrastructure(err.to_string())
    }
}

/// Boundary to the external object store.
///
/// Implementations must be atomic per call: a failed or interrupted `put`
/// must never leave a truncated object visible at the key.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object and return its durable reference.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Delete an object by key. Removing an absent key is not an error.
    async fn remove(&self, bucket: &str, key: &str) -> Result<(), StorageError>;
}
