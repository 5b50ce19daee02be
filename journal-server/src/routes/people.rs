//! Person CRUD, role mutation, and masthead projection.

use crate::auth_extractor::{AuthenticatedUser, MaybeAuthenticatedUser};
use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;
use journal_core::person::{MastheadEntry, PersonView};
use journal_core::roles::Role;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/people", get(list_people))
        .route("/people/masthead", get(masthead))
        .route("/people/create", post(create_person))
        .route("/people/add_role", put(add_role))
        .route("/people/delete_role", delete(delete_role))
        .route(
            "/people/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
}

async fn list_people(State(state): State<AppState>) -> ApiResult<Json<BTreeMap<String, PersonView>>> {
    let people = state.engine.list_people().await?;
    Ok(Json(
        people
            .into_iter()
            .map(|p| (p.id.clone(), PersonView::from(p)))
            .collect(),
    ))
}

async fn masthead(State(state): State<AppState>) -> ApiResult<Json<Vec<MastheadEntry>>> {
    Ok(Json(state.engine.masthead().await?))
}

async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersonView>> {
    Ok(Json(state.engine.get_person(&id).await?.into()))
}

#[derive(Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    #[serde(default)]
    pub affiliation: String,
    pub email: String,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

async fn create_person(
    State(state): State<AppState>,
    MaybeAuthenticatedUser(caller): MaybeAuthenticatedUser,
    Json(req): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<PersonView>)> {
    let roles = req
        .roles
        .iter()
        .map(|code| Role::parse(code))
        .collect::<Result<BTreeSet<_>, _>>()?;
    let person = state
        .engine
        .register_person(
            caller.as_ref(),
            &req.name,
            &req.affiliation,
            &req.email,
            roles,
            req.bio,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(person.into())))
}

#[derive(Deserialize)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub bio: Option<String>,
}

async fn update_person(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePersonRequest>,
) -> ApiResult<Json<PersonView>> {
    let person = state
        .engine
        .update_person(&caller, &id, req.name, req.affiliation, req.bio)
        .await?;
    Ok(Json(person.into()))
}

async fn delete_person(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.engine.delete_person(&caller, &id).await?;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub id: String,
    pub role: String,
}

async fn add_role(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<RoleRequest>,
) -> ApiResult<Json<PersonView>> {
    let role = Role::parse(&req.role)?;
    Ok(Json(
        state.engine.add_role(&caller, &req.id, role).await?.into(),
    ))
}

async fn delete_role(
    State(state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Json(req): Json<RoleRequest>,
) -> ApiResult<Json<PersonView>> {
    let role = Role::parse(&req.role)?;
    Ok(Json(
        state.engine.delete_role(&caller, &req.id, role).await?.into(),
    ))
}
