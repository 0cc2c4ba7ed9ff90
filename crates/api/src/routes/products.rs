//! Product routes: publication, listing, withdrawal.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use metamind_core::types::DbId;
use metamind_db::models::product::Product;
use metamind_pipeline::publishing::{PublishProduct, UploadedFile};

use crate::auth::AuthActor;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// `POST /api/products` -- publish a new product.
///
/// Multipart form: `title`, `description`, `price_cents` text fields plus
/// a required `content` file and an optional `preview` image.
async fn create_product(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Product>)> {
    let mut title = None;
    let mut description = String::new();
    let mut price_cents = None;
    let mut content = None;
    let mut preview = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(bad_field)?);
            }
            Some("description") => {
                description = field.text().await.map_err(bad_field)?;
            }
            Some("price_cents") => {
                let raw = field.text().await.map_err(bad_field)?;
                price_cents = Some(raw.parse::<i64>().map_err(|_| {
                    AppError::BadRequest("price_cents must be an integer".into())
                })?);
            }
            Some("content") => {
                content = Some(read_file(field).await?);
            }
            Some("preview") => {
                preview = Some(read_file(field).await?);
            }
            _ => {}
        }
    }

    let input = PublishProduct {
        title: title.ok_or_else(|| AppError::BadRequest("title is required".into()))?,
        description,
        price_cents: price_cents
            .ok_or_else(|| AppError::BadRequest("price_cents is required".into()))?,
        content: content
            .ok_or_else(|| AppError::BadRequest("content file is required".into()))?,
        preview,
    };

    let product = state.publish.create_product(actor, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products` -- products available for purchase.
async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.publish.list_active().await?))
}

/// `GET /api/my/products` -- the actor's own products, active or not.
async fn list_my_products(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.publish.list_owned(actor).await?))
}

/// `POST /api/products/{id}/deactivate` -- withdraw from sale.
async fn deactivate_product(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.publish.deactivate_product(actor, id).await?))
}

/// Pull a multipart field's declared MIME type and bytes.
pub(super) async fn read_file(
    field: axum::extract::multipart::Field<'_>,
) -> Result<UploadedFile, AppError> {
    let declared_type = field
        .content_type()
        .ok_or_else(|| AppError::BadRequest("file field is missing a content type".into()))?
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .to_vec();
    Ok(UploadedFile {
        declared_type,
        bytes,
    })
}

fn bad_field(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(err.to_string())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(create_product).get(list_products))
        .route("/api/my/products", get(list_my_products))
        .route("/api/products/{id}/deactivate", post(deactivate_product))
}
