//! Upload driver: progress window plus all-or-nothing cancellation.

use std::sync::Arc;

use metamind_core::upload::ValidatedUpload;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::gateway::{ObjectStorage, StorageError, StoredObject};
use crate::progress::UploadProgress;

/// Drives validated uploads through an [`ObjectStorage`] provider.
///
/// One uploader carries one progress window at a time; concurrent uploads
/// should each use their own `Uploader`.
pub struct Uploader {
    store: Arc<dyn ObjectStorage>,
    progress: UploadProgress,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStorage>) -> Self {
        Self {
            store,
            progress: UploadProgress::new(),
        }
    }

    /// Observe upload progress. `None` while idle.
    pub fn progress(&self) -> watch::Receiver<Option<u8>> {
        self.progress.watch()
    }

    /// Upload a validated file.
    ///
    /// Progress resets to 0 at the start and is cleared once the call
    /// finishes either way. When `cancel` fires before the backend call
    /// completes, the in-flight write future is dropped and
    /// [`StorageError::Cancelled`] is returned -- the object either fully
    /// exists at its key or not at all, never a truncated partial.
    pub async fn upload(
        &self,
        upload: &ValidatedUpload,
        bytes: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, StorageError> {
        self.progress.start();

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(StorageError::Cancelled),
            stored = self.store.put(
                upload.bucket,
                &upload.storage_key,
                bytes,
                &upload.content_type,
            ) => stored,
        };

        if result.is_ok() {
            self.progress.report(100);
        }
        self.progress.clear();

        result
    }

    /// Delete an object by key. Idempotent.
    pub async fn remove(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(bucket, key).await
    }
}
