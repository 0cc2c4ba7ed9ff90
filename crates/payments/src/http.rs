//! HTTP implementation of the payment gateway.

use std::time::Duration;

use async_trait::async_trait;
use metamind_core::types::DbId;
use serde::Deserialize;

use crate::gateway::{PaymentError, PaymentGateway, PaymentIntent, PaymentOutcome};

/// Payment gateway connection settings.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Base HTTP URL of the gateway.
    pub base_url: String,
    /// Server-side API key, sent as a bearer token.
    pub secret_key: String,
    /// Request timeout in seconds. Intent creation transitions to its
    /// error path on expiry instead of hanging.
    pub timeout_secs: u64,
}

impl PaymentConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `PAYMENT_GATEWAY_URL`  | `http://localhost:4242` |
    /// | `PAYMENT_SECRET_KEY`   | empty                   |
    /// | `PAYMENT_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:4242".into()),
            secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            timeout_secs: std::env::var("PAYMENT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Wire shape of `POST /payments/create-intent`.
#[derive(Debug, Deserialize)]
struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    client_secret: String,
}

/// Wire shape of `POST /payments/confirm`.
#[derive(Debug, Deserialize)]
struct ConfirmResponse {
    status: String,
    #[serde(rename = "paymentId")]
    payment_id: Option<String>,
    reason: Option<String>,
}

/// Production gateway implementation over the payment service REST API.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl HttpPaymentGateway {
    pub fn new(config: PaymentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        product_id: DbId,
    ) -> Result<PaymentIntent, PaymentError> {
        let body = serde_json::json!({
            "amount": amount_cents,
            "currency": currency,
            "productId": product_id,
        });

        let response = self
            .client
            .post(format!("{}/payments/create-intent", self.config.base_url))
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::IntentCreation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::IntentCreation(format!(
                "gateway returned {status}: {body}"
            )));
        }

        let parsed: CreateIntentResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::IntentCreation(e.to_string()))?;

        Ok(PaymentIntent {
            client_secret: parsed.client_secret,
        })
    }

    async fn confirm(
        &self,
        client_secret: &str,
        payment_method: &str,
    ) -> Result<PaymentOutcome, PaymentError> {
        let body = serde_json::json!({
            "clientSecret": client_secret,
            "paymentMethod": payment_method,
        });

        let response = self
            .client
            .post(format!("{}/payments/confirm", self.config.base_url))
            .bearer_auth(&self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Confirmation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Confirmation(format!(
                "gateway returned {status}: {body}"
            )));
        }

        let parsed: ConfirmResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Confirmation(e.to_string()))?;

        match parsed.status.as_str() {
            "succeeded" => {
                let payment_id = parsed.payment_id.ok_or_else(|| {
                    PaymentError::Confirmation("succeeded response without paymentId".into())
                })?;
                Ok(PaymentOutcome::Succeeded { payment_id })
            }
            _ => Ok(PaymentOutcome::Failed {
                reason: parsed
                    .reason
                    .unwrap_or_else(|| "payment declined".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_gateway_surfaces_intent_creation_error() {
        let gateway = HttpPaymentGateway::new(PaymentConfig {
            base_url: "http://127.0.0.1:9".into(),
            secret_key: "sk_test".into(),
            timeout_secs: 1,
        });

        let result = gateway.create_intent(500, "usd", 1).await;
        assert!(matches!(result, Err(PaymentError::IntentCreation(_))));
    }
}
