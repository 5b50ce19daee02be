//! Manuscript CRUD and the lifecycle transition endpoint.

use crate::auth_extractor::AuthenticatedUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, put};
use axum::Router;
use journal_core::manuscript::Manuscript;
use journal_core::state_machine::{Action, State as ManuscriptState};
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manuscript", get(list_manuscripts))
        .route("/manuscript/create", put(create_manuscript))
        .route("/manuscript/update", put(update_manuscript))
        .route("/manuscript/update_state", put(update_state))
        .route("/manuscript/editor_actions", get(editor_actions))
        .route("/manuscript/referee_actions", get(referee_actions))
        .route("/manuscript/valid_actions/:state", get(valid_actions))
        .route(
            "/manuscript/:id",
            get(get_manuscript).delete(delete_manuscript),
        )
}

async fn list_manuscripts(State(state): State<AppState>) -> ApiResult<Json<Vec<Manuscript>>> {
    Ok(Json(state.engine.list_manuscripts().await?))
}

async fn get_manuscript(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Manuscript>> {
    Ok(Json(state.engine.get_manuscript(&id).await?))
}

#[derive(Deserialize)]
pub struct CreateManuscriptRequest {
    pub title: String,
    pub author: String,
    pub author_email: String,
    pub editor_email: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub body: String,
}

async fn create_manuscript(
    State(state): State<AppState>,
    Json(req): Json<CreateManuscriptRequest>,
) -> ApiResult<(StatusCode, Json<Manuscript>)> {
    let manuscript = state
        .engine
        .create_manuscript(
            &req.title,
            &req.author,
            &req.author_email,
            &req.editor_email,
            &req.abstract_text,
            &req.body,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(manuscript)))
}

#[derive(Deserialize)]
pub struct UpdateManuscriptRequest {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub editor_email: Option<String>,
}

async fn update_manuscript(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<UpdateManuscriptRequest>,
) -> ApiResult<Json<Manuscript>> {
    let manuscript = state
        .engine
        .update_manuscript(
            &caller,
            &req.id,
            req.title,
            req.abstract_text,
            req.editor_email,
        )
        .await?;
    Ok(Json(manuscript))
}

async fn delete_manuscript(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.engine.delete_manuscript(&caller, &id).await?;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub struct UpdateStateRequest {
    pub id: String,
    pub action: String,
    pub referee: Option<String>,
}

async fn update_state(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<UpdateStateRequest>,
) -> ApiResult<Json<Manuscript>> {
    let action = Action::parse(&req.action)
        .ok_or_else(|| ApiError(journal_core::JournalError::invalid(format!(
            "unknown action code: {}",
            req.action
        ))))?;
    let manuscript = state
        .engine
        .update_manuscript_state(&caller, &req.id, action, req.referee.as_deref())
        .await?;
    Ok(Json(manuscript))
}

#[derive(Serialize)]
struct ActionList {
    actions: Vec<String>,
}

async fn valid_actions(Path(state): Path<String>) -> ApiResult<Json<ActionList>> {
    let state = ManuscriptState::parse(&state).ok_or_else(|| {
        ApiError(journal_core::JournalError::invalid(format!(
            "unknown state code: {state}"
        )))
    })?;
    Ok(Json(ActionList {
        actions: journal_core::state_machine::legal_actions(state)
            .into_iter()
            .map(|a| a.code().to_string())
            .collect(),
    }))
}

async fn editor_actions(State(state): State<AppState>) -> Json<ActionList> {
    Json(ActionList {
        actions: state
            .engine
            .editor_actions()
            .into_iter()
            .map(|a| a.code().to_string())
            .collect(),
    })
}

async fn referee_actions(State(state): State<AppState>) -> Json<ActionList> {
    Json(ActionList {
        actions: state
            .engine
            .referee_actions()
            .into_iter()
            .map(|a| a.code().to_string())
            .collect(),
    })
}
