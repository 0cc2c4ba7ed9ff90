//! Draft routes: versioned saves, listing, deletion, title tooling, and
//! content analysis.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use metamind_core::text::ContentAnalysis;
use metamind_core::types::DbId;
use metamind_db::models::draft::{CreateDraft, Draft};
use metamind_pipeline::TitleCheck;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthActor;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SaveDraftRequest {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    pub title: Option<String>,
    pub chapters: Option<Vec<String>>,
    pub word_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CheckTitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct SuggestTitlesRequest {
    pub content: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestTitlesResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeContentRequest {
    pub content: String,
}

/// `POST /api/drafts` -- save a new draft version.
async fn save_draft(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Json(req): Json<SaveDraftRequest>,
) -> AppResult<(StatusCode, Json<Draft>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let draft = state
        .drafts
        .save(
            actor,
            CreateDraft {
                content: req.content,
                title: req.title,
                chapters: req.chapters,
                word_count: req.word_count,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(draft)))
}

/// `GET /api/drafts` -- list the actor's drafts, newest version first.
async fn list_drafts(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
) -> AppResult<Json<Vec<Draft>>> {
    Ok(Json(state.drafts.list(actor).await?))
}

/// `DELETE /api/drafts/{id}` -- delete one draft.
async fn delete_draft(
    State(state): State<AppState>,
    AuthActor(actor): AuthActor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.drafts.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/check-title` -- advisory title uniqueness check.
async fn check_title(
    State(state): State<AppState>,
    AuthActor(_actor): AuthActor,
    Json(req): Json<CheckTitleRequest>,
) -> AppResult<Json<TitleCheck>> {
    Ok(Json(state.titles.check_title(&req.title).await))
}

/// `POST /api/suggest-titles` -- three title suggestions for content.
async fn suggest_titles(
    State(state): State<AppState>,
    AuthActor(_actor): AuthActor,
    Json(req): Json<SuggestTitlesRequest>,
) -> AppResult<Json<SuggestTitlesResponse>> {
    let suggestions = state
        .titles
        .suggest_titles(&req.content, req.category.as_deref())
        .await;
    Ok(Json(SuggestTitlesResponse { suggestions }))
}

/// `POST /api/analyze-content` -- structure raw text into a draft shape.
async fn analyze_content(
    State(state): State<AppState>,
    AuthActor(_actor): AuthActor,
    Json(req): Json<AnalyzeContentRequest>,
) -> AppResult<Json<ContentAnalysis>> {
    Ok(Json(state.ai.analyze_content(&req.content).await))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/drafts", post(save_draft).get(list_drafts))
        .route("/api/drafts/{id}", delete(delete_draft))
        .route("/api/check-title", post(check_title))
        .route("/api/suggest-titles", post(suggest_titles))
        .route("/api/analyze-content", post(analyze_content))
}
