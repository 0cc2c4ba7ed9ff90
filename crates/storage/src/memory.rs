//! In-memory storage provider for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::gateway::{ObjectStorage, StorageError, StoredObject};

/// Storage backend holding objects in a process-local map.
///
/// Supports fault injection (failing writes) and an artificial write delay
/// so cancellation behavior can be exercised deterministically.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    fail_writes: bool,
    write_delay: Option<Duration>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Delay every write by `delay` before committing it.
    pub fn with_write_delay(delay: Duration) -> Self {
        Self {
            write_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Whether an object exists at the key.
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_writes {
            return Err(StorageError::Write("injected write failure".into()));
        }

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), bytes);

        Ok(StoredObject {
            bucket: bucket.to_string(),
            storage_key: key.to_string(),
            public_url: format!("https://storage.test/{bucket}/{key}"),
        })
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        // Absent keys are fine -- removal is idempotent.
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_contains() {
        let storage = MemoryStorage::new();
        storage
            .put("ai-assets", "7/tok.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert!(storage.contains("ai-assets", "7/tok.png"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage
            .put("ai-assets", "7/tok.png", vec![1], "image/png")
            .await
            .unwrap();

        storage.remove("ai-assets", "7/tok.png").await.unwrap();
        assert!(!storage.contains("ai-assets", "7/tok.png"));

        // Removing again is not an error.
        storage.remove("ai-assets", "7/tok.png").await.unwrap();
    }

    #[tokio::test]
    async fn failing_backend_reports_write_error() {
        let storage = MemoryStorage::failing();
        let result = storage.put("ai-assets", "k", vec![], "image/png").await;
        assert!(matches!(result, Err(StorageError::Write(_))));
        assert!(storage.is_empty());
    }
}
