//! Text page CRUD, scoped to a manuscript via a `manuscript_id` query param.

use crate::auth_extractor::AuthenticatedUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use journal_core::text::TextPage;
use serde::Deserialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/text", get(list_text))
        .route("/text/create", put(create_text))
        .route("/text/update", put(update_text))
        .route("/text/:page", get(get_text).delete(delete_text))
}

#[derive(Deserialize)]
pub struct ManuscriptScope {
    pub manuscript_id: String,
}

async fn list_text(
    State(state): State<AppState>,
    Query(scope): Query<ManuscriptScope>,
) -> ApiResult<Json<Vec<TextPage>>> {
    Ok(Json(state.engine.list_text(&scope.manuscript_id).await?))
}

async fn get_text(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(scope): Query<ManuscriptScope>,
) -> ApiResult<Json<TextPage>> {
    Ok(Json(
        state.engine.get_text(&scope.manuscript_id, &page).await?,
    ))
}

#[derive(Deserialize)]
pub struct CreateTextRequest {
    pub manuscript_id: String,
    pub page: String,
    pub title: String,
    pub body: String,
}

async fn create_text(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<CreateTextRequest>,
) -> ApiResult<(StatusCode, Json<TextPage>)> {
    let page = state
        .engine
        .create_text(&caller, &req.manuscript_id, &req.page, &req.title, &req.body)
        .await?;
    Ok((StatusCode::CREATED, Json(page)))
}

#[derive(Deserialize)]
pub struct UpdateTextRequest {
    pub manuscript_id: String,
    pub page: String,
    pub title: Option<String>,
    pub body: Option<String>,
}

async fn update_text(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<UpdateTextRequest>,
) -> ApiResult<Json<TextPage>> {
    let page = state
        .engine
        .update_text(&caller, &req.manuscript_id, &req.page, req.title, req.body)
        .await?;
    Ok(Json(page))
}

async fn delete_text(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(page): Path<String>,
    Query(scope): Query<ManuscriptScope>,
) -> ApiResult<StatusCode> {
    state
        .engine
        .delete_text(&caller, &scope.manuscript_id, &page)
        .await?;
    Ok(StatusCode::OK)
}
