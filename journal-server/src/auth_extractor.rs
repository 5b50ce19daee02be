//! Resolves the caller identity carried in `X-User-Id` into a
//! `journal_core::person::Person`. The header carries a stable ID or an
//! email directly rather than a bearer token.

use crate::error::ApiError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use journal_core::error::JournalError;
use journal_core::person::Person;

pub struct AuthenticatedUser(pub Person);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .ok_or(JournalError::Unauthenticated)?;

        let person = state.engine.resolve_caller(raw).await?;
        Ok(AuthenticatedUser(person))
    }
}

/// Like `AuthenticatedUser`, but does not fail when the header is absent or
/// unresolvable — used by endpoints where authorization only kicks in
/// conditionally (e.g. bootstrap registration).
pub struct MaybeAuthenticatedUser(pub Option<Person>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get("X-User-Id").and_then(|v| v.to_str().ok()) else {
            return Ok(MaybeAuthenticatedUser(None));
        };

        match state.engine.resolve_caller(raw).await {
            Ok(person) => Ok(MaybeAuthenticatedUser(Some(person))),
            Err(JournalError::Unauthenticated) => Ok(MaybeAuthenticatedUser(None)),
            Err(e) => Err(e.into()),
        }
    }
}
