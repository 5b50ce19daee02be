pub mod auth;
pub mod manuscripts;
pub mod misc;
pub mod people;
pub mod text;

use crate::state::AppState;
use axum::Router;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(misc::router())
        .merge(people::router())
        .merge(manuscripts::router())
        .merge(text::router())
        .merge(auth::router())
        .with_state(state)
}
