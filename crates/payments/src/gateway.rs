//! Payment gateway trait and types.

use async_trait::async_trait;
use metamind_core::error::CoreError;
use metamind_core::types::DbId;
use serde::{Deserialize, Serialize};

/// A created payment intent, identified to the client by its secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// Result of confirming a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PaymentOutcome {
    /// The gateway captured the payment.
    Succeeded { payment_id: String },
    /// The gateway declined; `reason` is the gateway-reported message.
    Failed { reason: String },
}

/// Errors from the payment gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Intent creation failed (gateway or network fault). Surfaced to the
    /// caller without retry -- amounts must not be double-submitted blindly.
    #[error("Payment intent creation failed: {0}")]
    IntentCreation(String),

    /// The confirmation exchange itself failed (as opposed to a declined
    /// payment, which is a [`PaymentOutcome::Failed`]).
    #[error("Payment confirmation failed: {0}")]
    Confirmation(String),
}

impl From<PaymentError> for CoreError {
    fn from(err: PaymentError) -> Self {
        CoreError::Infrastructure(err.to_string())
    }
}

/// Boundary to the external payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for `amount_cents` against a product.
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        product_id: DbId,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Confirm an intent with the buyer's payment method.
    ///
    /// A declined payment is an `Ok(PaymentOutcome::Failed)`, not an error;
    /// errors mean the exchange itself could not complete.
    async fn confirm(
        &self,
        client_secret: &str,
        payment_method: &str,
    ) -> Result<PaymentOutcome, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_status_tag() {
        let succeeded = PaymentOutcome::Succeeded {
            payment_id: "pi_123".into(),
        };
        let json = serde_json::to_value(&succeeded).unwrap();
        assert_eq!(json["status"], "succeeded");
        assert_eq!(json["payment_id"], "pi_123");

        let failed: PaymentOutcome =
            serde_json::from_str(r#"{"status": "failed", "reason": "card_declined"}"#).unwrap();
        assert!(matches!(failed, PaymentOutcome::Failed { reason } if reason == "card_declined"));
    }
}
