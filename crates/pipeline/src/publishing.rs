//! Publication flow: validated asset uploads and product lifecycle.
//!
//! Assets are validated and uploaded before the product row is written.
//! If the row insert then fails, the just-uploaded objects are removed so
//! no partially published product is ever observable.

use std::sync::Arc;

use metamind_core::error::CoreError;
use metamind_core::types::{Actor, DbId};
use metamind_core::upload::UploadContext;
use metamind_db::models::product::{CreateProduct, Product};
use metamind_db::repositories::ProductRepo;
use metamind_db::DbPool;
use metamind_events::{ChangeEvent, EntityKind, EventBus};
use metamind_storage::{ObjectStorage, StoredObject, Uploader};
use tokio_util::sync::CancellationToken;

use crate::infra;

/// A file received from the client: declared MIME type plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

/// Input for publishing a new product.
#[derive(Debug, Clone)]
pub struct PublishProduct {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub content: UploadedFile,
    pub preview: Option<UploadedFile>,
}

/// Uploads assets and manages the product lifecycle.
pub struct PublishService {
    pool: DbPool,
    store: Arc<dyn ObjectStorage>,
    bus: Arc<EventBus>,
}

impl PublishService {
    pub fn new(pool: DbPool, store: Arc<dyn ObjectStorage>, bus: Arc<EventBus>) -> Self {
        Self { pool, store, bus }
    }

    /// Upload a content file into the actor's folder of `ai-assets`.
    pub async fn upload_content(
        &self,
        actor: Actor,
        file: UploadedFile,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, CoreError> {
        self.upload_with(UploadContext::content_asset(), actor, file, cancel)
            .await
    }

    /// Upload a preview image into `ai-assets/previews/`.
    pub async fn upload_preview(
        &self,
        actor: Actor,
        file: UploadedFile,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, CoreError> {
        self.upload_with(UploadContext::preview_image(), actor, file, cancel)
            .await
    }

    /// Upload an avatar image into the actor's folder of `user-avatars`.
    pub async fn upload_avatar(
        &self,
        actor: Actor,
        file: UploadedFile,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, CoreError> {
        self.upload_with(UploadContext::avatar(), actor, file, cancel)
            .await
    }

    async fn upload_with(
        &self,
        context: UploadContext,
        actor: Actor,
        file: UploadedFile,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, CoreError> {
        let validated =
            context.validate(&file.declared_type, file.bytes.len() as u64, actor.id)?;
        let uploader = Uploader::new(self.store.clone());
        uploader
            .upload(&validated, file.bytes, cancel)
            .await
            .map_err(CoreError::from)
    }

    /// Publish a new product: upload its assets, insert the row, signal.
    pub async fn create_product(
        &self,
        actor: Actor,
        input: PublishProduct,
    ) -> Result<Product, CoreError> {
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("Product title must not be empty".into()));
        }
        if input.price_cents < 0 {
            return Err(CoreError::Validation("Price must be non-negative".into()));
        }

        let cancel = CancellationToken::new();
        let content = self
            .upload_content(actor, input.content.clone(), &cancel)
            .await?;

        let preview = match input.preview.clone() {
            Some(file) => match self.upload_preview(actor, file, &cancel).await {
                Ok(stored) => Some(stored),
                Err(e) => {
                    // The content object is already durable; remove it so the
                    // failed publication leaves nothing behind.
                    self.discard(&content).await;
                    return Err(e);
                }
            },
            None => None,
        };

        let create = CreateProduct {
            title: input.title,
            description: input.description,
            content_key: content.storage_key.clone(),
            content_url: content.public_url.clone(),
            preview_key: preview.as_ref().map(|p| p.storage_key.clone()),
            preview_url: preview.as_ref().map(|p| p.public_url.clone()),
            price_cents: input.price_cents,
        };

        match ProductRepo::create(&self.pool, actor.id, &create).await {
            Ok(product) => {
                self.bus.publish(
                    ChangeEvent::new("product.created")
                        .with_entity(EntityKind::Products, product.id)
                        .with_actor(actor.id),
                );
                Ok(product)
            }
            Err(e) => {
                self.discard(&content).await;
                if let Some(p) = &preview {
                    self.discard(p).await;
                }
                Err(infra(e))
            }
        }
    }

    /// Withdraw a product from sale. Rows are deactivated, never deleted.
    pub async fn deactivate_product(&self, actor: Actor, id: DbId) -> Result<Product, CoreError> {
        let product = ProductRepo::find_by_id(&self.pool, id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("product", id))?;

        if product.owner_id != actor.id {
            return Err(CoreError::Forbidden(
                "Products can only be withdrawn by their owner".into(),
            ));
        }

        let updated = ProductRepo::deactivate(&self.pool, id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("product", id))?;

        self.bus.publish(
            ChangeEvent::new("product.deactivated")
                .with_entity(EntityKind::Products, id)
                .with_actor(actor.id),
        );
        Ok(updated)
    }

    /// List products available for purchase.
    pub async fn list_active(&self) -> Result<Vec<Product>, CoreError> {
        ProductRepo::list_active(&self.pool).await.map_err(infra)
    }

    /// List the actor's own products, active or not.
    pub async fn list_owned(&self, actor: Actor) -> Result<Vec<Product>, CoreError> {
        ProductRepo::list_for_owner(&self.pool, actor.id)
            .await
            .map_err(infra)
    }

    /// Best-effort removal of an orphaned object after a failed publish.
    async fn discard(&self, stored: &StoredObject) {
        if let Err(e) = self.store.remove(&stored.bucket, &stored.storage_key).await {
            tracing::warn!(
                error = %e,
                bucket = %stored.bucket,
                key = %stored.storage_key,
                "Failed to remove orphaned upload"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use metamind_storage::MemoryStorage;

    use super::*;

    fn service(store: Arc<MemoryStorage>) -> PublishService {
        let pool = metamind_db::create_lazy_pool("postgres://127.0.0.1:1/unreachable").unwrap();
        PublishService::new(pool, store, Arc::new(EventBus::default()))
    }

    fn png(len: usize) -> UploadedFile {
        UploadedFile {
            declared_type: "image/png".into(),
            bytes: vec![0u8; len],
        }
    }

    #[tokio::test]
    async fn upload_content_lands_in_actor_folder() {
        let store = Arc::new(MemoryStorage::new());
        let stored = service(store.clone())
            .upload_content(
                Actor::new(7),
                UploadedFile {
                    declared_type: "application/pdf".into(),
                    bytes: vec![0u8; 128],
                },
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(stored.bucket, "ai-assets");
        assert!(stored.storage_key.starts_with("7/"));
        assert!(stored.storage_key.ends_with(".pdf"));
        assert!(store.contains("ai-assets", &stored.storage_key));
    }

    #[tokio::test]
    async fn invalid_type_fails_validation_without_touching_storage() {
        let store = Arc::new(MemoryStorage::new());
        let result = service(store.clone())
            .upload_preview(
                Actor::new(7),
                UploadedFile {
                    declared_type: "application/zip".into(),
                    bytes: vec![0u8; 128],
                },
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_product_insert_removes_uploaded_objects() {
        // Storage accepts the uploads, then the (unreachable) store fails
        // the row insert: the uploaded objects must be cleaned up again.
        let store = Arc::new(MemoryStorage::new());
        let result = service(store.clone())
            .create_product(
                Actor::new(7),
                PublishProduct {
                    title: "Sleep Hacks".into(),
                    description: "A guide".into(),
                    price_cents: 500,
                    content: png(256),
                    preview: Some(png(64)),
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::Infrastructure(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn negative_price_rejected_before_any_upload() {
        let store = Arc::new(MemoryStorage::new());
        let result = service(store.clone())
            .create_product(
                Actor::new(7),
                PublishProduct {
                    title: "Sleep Hacks".into(),
                    description: String::new(),
                    price_cents: -1,
                    content: png(256),
                    preview: None,
                },
            )
            .await;

        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(store.is_empty());
    }
}
