//! Mint request state machine service.
//!
//! Requests are created `pending` and move exactly once, to `minted` or
//! `failed`, driven by an external confirmation callback. The repository's
//! guarded updates make duplicate confirmation deliveries affect zero
//! rows; this service reports those as conflicts without touching the row.

use std::sync::Arc;

use metamind_chain::{MintConfirmation, MintSubmitter, NftMetadata};
use metamind_core::error::CoreError;
use metamind_core::mint::{MINT_STATUS_FAILED, MINT_STATUS_MINTED};
use metamind_core::types::{Actor, DbId};
use metamind_db::models::mint_request::MintRequest;
use metamind_db::models::product::Product;
use metamind_db::repositories::{MintRequestRepo, ProductRepo};
use metamind_db::DbPool;
use metamind_events::{ChangeEvent, EntityKind, EventBus};

use crate::infra;

/// Drives mint requests from submission through confirmation.
pub struct MintService {
    pool: DbPool,
    bus: Arc<EventBus>,
    submitter: Arc<dyn MintSubmitter>,
    /// Base URL for product pages referenced from NFT metadata.
    public_base_url: String,
}

impl MintService {
    pub fn new(
        pool: DbPool,
        bus: Arc<EventBus>,
        submitter: Arc<dyn MintSubmitter>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            bus,
            submitter,
            public_base_url: public_base_url.into(),
        }
    }

    /// Create a mint request for one of the actor's products and submit
    /// it to the minting backend.
    ///
    /// The request row is written first so the submission can reference
    /// its id; a failed submission immediately transitions the request to
    /// `failed` before the error surfaces.
    pub async fn create_request(
        &self,
        actor: Actor,
        product_id: DbId,
    ) -> Result<MintRequest, CoreError> {
        let product = ProductRepo::find_owned(&self.pool, product_id, actor.id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("product", product_id))?;

        let request = MintRequestRepo::create(&self.pool, product_id, actor.id)
            .await
            .map_err(infra)?;

        self.publish_change("mint_request.created", request.id, actor.id);

        let metadata = self.metadata_for(&product);
        if let Err(e) = self.submitter.submit(request.id, &metadata).await {
            tracing::error!(error = %e, request_id = request.id, "Mint submission failed");
            let failed = MintRequestRepo::mark_failed(&self.pool, request.id)
                .await
                .map_err(infra)?;
            if let Some(r) = failed {
                self.publish_change("mint_request.failed", r.id, actor.id);
            }
            return Err(CoreError::Infrastructure(format!(
                "Mint submission failed: {e}"
            )));
        }

        Ok(request)
    }

    /// Apply an external confirmation to a pending request.
    ///
    /// Applying to a request not in `pending` is rejected with a conflict
    /// and leaves the row untouched -- the idempotency guard against
    /// duplicate confirmation delivery.
    pub async fn apply_confirmation(
        &self,
        request_id: DbId,
        confirmation: MintConfirmation,
    ) -> Result<MintRequest, CoreError> {
        let (updated, event_type, target) = match &confirmation {
            MintConfirmation::Minted {
                txn_hash,
                metadata_url,
            } => (
                MintRequestRepo::mark_minted(&self.pool, request_id, txn_hash, metadata_url)
                    .await
                    .map_err(infra)?,
                "mint_request.minted",
                MINT_STATUS_MINTED,
            ),
            MintConfirmation::Failed => (
                MintRequestRepo::mark_failed(&self.pool, request_id)
                    .await
                    .map_err(infra)?,
                "mint_request.failed",
                MINT_STATUS_FAILED,
            ),
        };

        match updated {
            Some(request) => {
                self.publish_change(event_type, request.id, request.owner_id);
                Ok(request)
            }
            None => {
                // Zero rows affected: either the id is unknown or the
                // request already reached a terminal state.
                let existing = MintRequestRepo::find_by_id(&self.pool, request_id)
                    .await
                    .map_err(infra)?
                    .ok_or_else(|| CoreError::not_found("mint request", request_id))?;

                Err(CoreError::Conflict(format!(
                    "Invalid mint transition from '{}' to '{target}'",
                    existing.status
                )))
            }
        }
    }

    /// List the actor's mint requests, newest first.
    pub async fn list_requests(&self, actor: Actor) -> Result<Vec<MintRequest>, CoreError> {
        MintRequestRepo::list_for_owner(&self.pool, actor.id)
            .await
            .map_err(infra)
    }

    /// Fetch a single request, enforcing ownership.
    pub async fn get_request(&self, actor: Actor, id: DbId) -> Result<MintRequest, CoreError> {
        let request = MintRequestRepo::find_by_id(&self.pool, id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("mint request", id))?;

        if request.owner_id != actor.id {
            return Err(CoreError::Forbidden(
                "Mint requests are only visible to their owner".into(),
            ));
        }
        Ok(request)
    }

    /// Build the metadata document submitted alongside a mint.
    fn metadata_for(&self, product: &Product) -> NftMetadata {
        let mut metadata = NftMetadata::new(&product.title, &product.description)
            .with_external_url(format!("{}/product/{}", self.public_base_url, product.id))
            .with_attribute("Category", "Knowledge")
            .with_attribute(
                "Creation Date",
                product.created_at.format("%Y-%m-%d").to_string(),
            );
        if let Some(preview) = &product.preview_url {
            metadata = metadata.with_image(preview);
        }
        metadata
    }

    fn publish_change(&self, event_type: &str, request_id: DbId, actor_id: DbId) {
        self.bus.publish(
            ChangeEvent::new(event_type)
                .with_entity(EntityKind::MintRequests, request_id)
                .with_actor(actor_id),
        );
    }
}
