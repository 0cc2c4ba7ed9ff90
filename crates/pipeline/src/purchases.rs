//! Purchase and payment orchestration.
//!
//! Two phases: intent creation (server-side, surfaced without retry) and
//! confirmation. A purchase row is written only after the gateway reports
//! success, capturing the product's price at that moment -- access is
//! never granted optimistically.

use std::sync::Arc;

use metamind_core::error::CoreError;
use metamind_core::types::{Actor, DbId};
use metamind_db::models::purchase::Purchase;
use metamind_db::repositories::{ProductRepo, PurchaseRepo};
use metamind_db::DbPool;
use metamind_events::{ChangeEvent, EntityKind, EventBus};
use metamind_payments::{PaymentGateway, PaymentOutcome};
use serde::Serialize;

use crate::infra;

/// Currency all intents are created in.
const CURRENCY: &str = "usd";

/// Result of a confirmation attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PurchaseOutcome {
    /// Payment captured; access granted via the recorded purchase.
    Succeeded { purchase: Purchase },
    /// Payment declined; nothing was recorded.
    Failed { reason: String },
}

/// Drives the two-phase purchase flow.
pub struct PurchaseService {
    pool: DbPool,
    gateway: Arc<dyn PaymentGateway>,
    bus: Arc<EventBus>,
}

impl PurchaseService {
    pub fn new(pool: DbPool, gateway: Arc<dyn PaymentGateway>, bus: Arc<EventBus>) -> Self {
        Self { pool, gateway, bus }
    }

    /// Phase 1: create a payment intent for a product.
    ///
    /// The product must exist, be active, and not already be owned by the
    /// buyer. Gateway faults surface as infrastructure errors without an
    /// automatic retry -- re-submitting an amount blindly is the one thing
    /// this path must never do.
    pub async fn create_intent(
        &self,
        actor: Actor,
        product_id: DbId,
        amount_cents: i64,
    ) -> Result<String, CoreError> {
        if amount_cents <= 0 {
            return Err(CoreError::Validation("Amount must be positive".into()));
        }

        let product = ProductRepo::find_by_id(&self.pool, product_id)
            .await
            .map_err(infra)?
            .ok_or_else(|| CoreError::not_found("product", product_id))?;

        if !product.is_active {
            return Err(CoreError::Validation(
                "Product is not available for purchase".into(),
            ));
        }

        let already_owned =
            PurchaseRepo::exists_for_buyer_and_product(&self.pool, actor.id, product_id)
                .await
                .map_err(infra)?;
        if already_owned {
            return Err(CoreError::Conflict(
                "Product was already purchased by this buyer".into(),
            ));
        }

        let intent = self
            .gateway
            .create_intent(amount_cents, CURRENCY, product_id)
            .await
            .map_err(CoreError::from)?;

        Ok(intent.client_secret)
    }

    /// Phase 2: confirm the intent and, on success, record the purchase.
    ///
    /// The recorded price is the product's price at confirmation time and
    /// is immune to later price changes. A declined payment records
    /// nothing and reports the gateway's reason.
    pub async fn confirm(
        &self,
        actor: Actor,
        product_id: DbId,
        client_secret: &str,
        payment_method: &str,
    ) -> Result<PurchaseOutcome, CoreError> {
        let outcome = self
            .gateway
            .confirm(client_secret, payment_method)
            .await
            .map_err(CoreError::from)?;

        match outcome {
            PaymentOutcome::Failed { reason } => {
                tracing::info!(buyer_id = actor.id, product_id, %reason, "Payment declined");
                Ok(PurchaseOutcome::Failed { reason })
            }
            PaymentOutcome::Succeeded { payment_id } => {
                let product = ProductRepo::find_by_id(&self.pool, product_id)
                    .await
                    .map_err(infra)?
                    .ok_or_else(|| CoreError::not_found("product", product_id))?;

                let purchase = PurchaseRepo::create(
                    &self.pool,
                    actor.id,
                    product_id,
                    product.price_cents,
                    &payment_id,
                )
                .await
                .map_err(infra)?;

                self.bus.publish(
                    ChangeEvent::new("purchase.created")
                        .with_entity(EntityKind::Purchases, purchase.id)
                        .with_actor(actor.id),
                );

                Ok(PurchaseOutcome::Succeeded { purchase })
            }
        }
    }

    /// List the actor's purchases, newest first.
    pub async fn list(&self, actor: Actor) -> Result<Vec<Purchase>, CoreError> {
        PurchaseRepo::list_for_buyer(&self.pool, actor.id)
            .await
            .map_err(infra)
    }
}

#[cfg(test)]
mod tests {
    use metamind_payments::StubGateway;

    use super::*;

    fn service(gateway: Arc<dyn PaymentGateway>) -> PurchaseService {
        let pool = metamind_db::create_lazy_pool("postgres://127.0.0.1:1/unreachable").unwrap();
        PurchaseService::new(pool, gateway, Arc::new(EventBus::default()))
    }

    #[tokio::test]
    async fn declined_confirmation_records_nothing() {
        // The store is unreachable; a declined payment must not need it.
        let svc = service(Arc::new(StubGateway::declining("card_declined")));

        let outcome = svc
            .confirm(Actor::new(3), 9, "cs_test", "card")
            .await
            .unwrap();

        assert!(
            matches!(outcome, PurchaseOutcome::Failed { reason } if reason == "card_declined")
        );
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_before_the_gateway() {
        let gateway = Arc::new(StubGateway::succeeding("pi_1"));
        let svc = service(gateway.clone());

        let result = svc.create_intent(Actor::new(3), 9, 0).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(gateway.intents_created(), 0);
    }

    #[tokio::test]
    async fn gateway_fault_surfaces_as_infrastructure_error() {
        let svc = service(Arc::new(StubGateway::unavailable()));

        let result = svc
            .confirm(Actor::new(3), 9, "cs_test", "card")
            .await;
        assert!(matches!(result, Err(CoreError::Infrastructure(_))));
    }
}
