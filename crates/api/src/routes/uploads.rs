//! Standalone upload routes.
//!
//! Each accepts a single multipart file field and returns the durable
//! storage reference. Client-abandoned requests drop the handler future,
//! which cancels the in-flight upload without leaving a partial object.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use metamind_pipeline::publishing::UploadedFile;
use metamind_storage::StoredObject;
use tokio_util::sync::CancellationToken;

use crate::auth::AuthActor;
use crate::error::{AppError, AppResult};
use crate::routes::products::read_file;
use crate::state::AppState;

async fn first_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.content_type().is_some() {
            return read_file(field).await;
        }
    }
    Err(AppError::BadRequest("no file field in request".into()))
}

/// `POST /api/uploads/content` -- product content file.
async fn upload_content(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredObject>)> {
    let file = first_file(multipart).await?;
    let stored = state
        .publish
        .upload_content(actor, file, &CancellationToken::new())
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `POST /api/uploads/preview` -- product preview image.
async fn upload_preview(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredObject>)> {
    let file = first_file(multipart).await?;
    let stored = state
        .publish
        .upload_preview(actor, file, &CancellationToken::new())
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `POST /api/uploads/avatar` -- user avatar image.
async fn upload_avatar(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredObject>)> {
    let file = first_file(multipart).await?;
    let stored = state
        .publish
        .upload_avatar(actor, file, &CancellationToken::new())
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/uploads/content", post(upload_content))
        .route("/api/uploads/preview", post(upload_preview))
        .route("/api/uploads/avatar", post(upload_avatar))
}
