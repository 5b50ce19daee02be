//! Liveness, introspection, and journal metadata. Unprotected, read-only,
//! and deliberately uninteresting — the engineering effort in this crate
//! lives in the manuscript lifecycle, not here.

use crate::state::AppState;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use journal_core::roles::Role;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const JOURNAL_TITLE: &str = "Journal of Editorial Systems";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello))
        .route("/endpoints", get(endpoints))
        .route("/title", get(title))
        .route("/roles", get(roles))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "hello from the journal editorial backend" }))
}

async fn endpoints(State(_state): State<AppState>) -> Json<Value> {
    Json(json!({
        "endpoints": [
            "GET /hello", "GET /endpoints", "GET /title", "GET /roles",
            "GET /people", "GET /people/{id}", "PUT /people/{id}", "DELETE /people/{id}",
            "POST /people/create", "PUT /people/add_role", "DELETE /people/delete_role",
            "GET /people/masthead",
            "GET /text", "GET /text/{page}", "PUT /text/create", "PUT /text/update", "DELETE /text/{page}",
            "GET /manuscript", "GET /manuscript/{id}", "PUT /manuscript/create",
            "PUT /manuscript/update", "PUT /manuscript/update_state", "DELETE /manuscript/{id}",
            "GET /manuscript/valid_actions/{state}", "GET /manuscript/editor_actions",
            "GET /manuscript/referee_actions",
            "POST /auth/register", "POST /auth/login",
        ]
    }))
}

async fn title() -> Json<Value> {
    Json(json!({ "title": JOURNAL_TITLE }))
}

async fn roles() -> Json<BTreeMap<&'static str, &'static str>> {
    let mut map = BTreeMap::new();
    for role in Role::ALL {
        map.insert(role.code(), role.display_name());
    }
    Json(map)
}
