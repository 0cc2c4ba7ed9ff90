//! In-process gateway double for tests and local development.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use metamind_core::types::DbId;

use crate::gateway::{PaymentError, PaymentGateway, PaymentIntent, PaymentOutcome};

/// Gateway double returning a scripted confirmation outcome.
pub struct StubGateway {
    outcome: Mutex<PaymentOutcome>,
    intents_created: AtomicU64,
    fail_calls: bool,
}

impl StubGateway {
    /// A gateway whose confirmations always succeed with `payment_id`.
    pub fn succeeding(payment_id: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(PaymentOutcome::Succeeded {
                payment_id: payment_id.into(),
            }),
            intents_created: AtomicU64::new(0),
            fail_calls: false,
        }
    }

    /// A gateway whose confirmations are declined with `reason`.
    pub fn declining(reason: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(PaymentOutcome::Failed {
                reason: reason.into(),
            }),
            intents_created: AtomicU64::new(0),
            fail_calls: false,
        }
    }

    /// A gateway where both phases always error.
    pub fn unavailable() -> Self {
        Self {
            outcome: Mutex::new(PaymentOutcome::Failed {
                reason: "unavailable".into(),
            }),
            intents_created: AtomicU64::new(0),
            fail_calls: true,
        }
    }

    /// Number of intents created so far.
    pub fn intents_created(&self) -> u64 {
        self.intents_created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn create_intent(
        &self,
        _amount_cents: i64,
        _currency: &str,
        product_id: DbId,
    ) -> Result<PaymentIntent, PaymentError> {
        if self.fail_calls {
            return Err(PaymentError::IntentCreation("injected gateway fault".into()));
        }
        let n = self.intents_created.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentIntent {
            client_secret: format!("cs_stub_{product_id}_{n}"),
        })
    }

    async fn confirm(
        &self,
        _client_secret: &str,
        _payment_method: &str,
    ) -> Result<PaymentOutcome, PaymentError> {
        if self.fail_calls {
            return Err(PaymentError::Confirmation("injected gateway fault".into()));
        }
        Ok(self.outcome.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_outcomes_are_returned() {
        let gateway = StubGateway::declining("card_declined");
        let intent = gateway.create_intent(500, "usd", 7).await.unwrap();
        assert!(intent.client_secret.starts_with("cs_stub_7_"));

        let outcome = gateway.confirm(&intent.client_secret, "card").await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Failed { reason } if reason == "card_declined"));
    }

    #[tokio::test]
    async fn unavailable_gateway_errors_on_intent() {
        let gateway = StubGateway::unavailable();
        assert!(gateway.create_intent(500, "usd", 1).await.is_err());
        assert_eq!(gateway.intents_created(), 0);
    }
}
