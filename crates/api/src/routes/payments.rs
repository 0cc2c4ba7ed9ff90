//! Payment and purchase routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use metamind_core::types::DbId;
use metamind_db::models::purchase::Purchase;
use metamind_pipeline::PurchaseOutcome;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthActor;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIntentRequest {
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    #[serde(rename = "productId")]
    pub product_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(rename = "productId")]
    pub product_id: DbId,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
}

/// `POST /api/payments/create-intent` -- phase 1 of a purchase.
///
/// Gateway faults surface as errors; the server never retries an amount
/// on its own.
async fn create_intent(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<CreateIntentRequest>,
) -> AppResult<Json<CreateIntentResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let client_secret = state
        .purchases
        .create_intent(actor, req.product_id, req.amount)
        .await?;

    Ok(Json(CreateIntentResponse { client_secret }))
}

/// `POST /api/payments/confirm` -- phase 2: confirm and unlock.
///
/// A declined payment is a 200 with `status: "failed"`; a purchase row
/// exists only for `status: "succeeded"`.
async fn confirm(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<ConfirmRequest>,
) -> AppResult<Json<PurchaseOutcome>> {
    let outcome = state
        .purchases
        .confirm(actor, req.product_id, &req.client_secret, &req.payment_method)
        .await?;
    Ok(Json(outcome))
}

/// `GET /api/purchases` -- the actor's purchases, newest first.
async fn list_purchases(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<Vec<Purchase>>> {
    Ok(Json(state.purchases.list(actor).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/payments/create-intent", post(create_intent))
        .route("/api/payments/confirm", post(confirm))
        .route("/api/purchases", get(list_purchases))
}
