//! Credential registration and login. Login failures are
//! indistinguishable between "no such user" and "wrong password" —
//! `AuthGate::login` already collapses both into `Unauthenticated`.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct IdentityResponse {
    pub id: String,
}

async fn register(
    State(state): axum::extract::State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<IdentityResponse>)> {
    let id = state
        .engine
        .register_credentials(&req.name, &req.email, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(IdentityResponse { id })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

async fn login(
    State(state): axum::extract::State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<IdentityResponse>> {
    let id = state.engine.login(&req.identifier, &req.password).await?;
    Ok(Json(IdentityResponse { id }))
}
