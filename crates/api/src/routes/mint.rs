//! Mint request routes and blockchain reads.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use metamind_chain::MintConfirmation;
use metamind_core::error::CoreError;
use metamind_core::types::DbId;
use metamind_db::models::mint_request::MintRequest;
use serde::Serialize;

use crate::auth::AuthActor;
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct OwnerResponse {
    token_id: u64,
    owner: String,
}

#[derive(Debug, Serialize)]
struct MetadataResponse {
    token_id: u64,
    token_uri: String,
    metadata: metamind_chain::NftMetadata,
}

/// `POST /api/products/{id}/mint` -- request minting for a product.
async fn create_mint_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(product_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<MintRequest>)> {
    let request = state.mint.create_request(actor, product_id).await?;
    // Accepted: confirmation arrives asynchronously from the worker.
    Ok((StatusCode::ACCEPTED, Json(request)))
}

/// `GET /api/mint-requests` -- the actor's mint requests, newest first.
async fn list_mint_requests(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<Vec<MintRequest>>> {
    Ok(Json(state.mint.list_requests(actor).await?))
}

/// `GET /api/mint-requests/{id}` -- one request's status.
async fn get_mint_request(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<MintRequest>> {
    Ok(Json(state.mint.get_request(actor, id).await?))
}

/// `POST /api/mint-requests/{id}/confirmation` -- worker callback.
///
/// Authenticated by the shared confirmation secret, not a user token.
/// Duplicate deliveries are rejected with a conflict and leave the
/// request untouched.
async fn apply_confirmation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
    Json(confirmation): Json<MintConfirmation>,
) -> AppResult<Json<MintRequest>> {
    let provided = headers
        .get("x-confirmation-secret")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if state.confirmation_secret.is_empty() || provided != state.confirmation_secret {
        return Err(CoreError::Unauthorized("Invalid confirmation secret".into()).into());
    }

    let request = state.mint.apply_confirmation(id, confirmation).await?;
    Ok(Json(request))
}

/// `GET /api/nft/{token_id}/owner` -- current on-chain owner.
async fn nft_owner(
    State(state): State<AppState>,
    Path(token_id): Path<u64>,
) -> AppResult<Json<OwnerResponse>> {
    let owner = state
        .chain
        .owner_of(token_id)
        .await
        .map_err(CoreError::from)?;
    Ok(Json(OwnerResponse { token_id, owner }))
}

/// `GET /api/nft/{token_id}/metadata` -- resolved metadata document.
///
/// `ipfs://` token URIs are rewritten to the public gateway before the
/// fetch.
async fn nft_metadata(
    State(state): State<AppState>,
    Path(token_id): Path<u64>,
) -> AppResult<Json<MetadataResponse>> {
    let token_uri = state
        .chain
        .token_uri(token_id)
        .await
        .map_err(CoreError::from)?;
    let metadata = state
        .metadata
        .fetch(&token_uri)
        .await
        .map_err(CoreError::from)?;

    Ok(Json(MetadataResponse {
        token_id,
        token_uri,
        metadata,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products/{id}/mint", post(create_mint_request))
        .route("/api/mint-requests", get(list_mint_requests))
        .route("/api/mint-requests/{id}", get(get_mint_request))
        .route("/api/mint-requests/{id}/confirmation", post(apply_confirmation))
        .route("/api/nft/{token_id}/owner", get(nft_owner))
        .route("/api/nft/{token_id}/metadata", get(nft_metadata))
}
