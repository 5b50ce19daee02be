//! Shared application state: one `JournalEngine` behind an `Arc`, constructed
//! once at startup and injected into the router — no lazily-initialized
//! process-wide global).

use journal_core::JournalEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<JournalEngine>,
}

impl AppState {
    pub fn new(engine: Arc<JournalEngine>) -> Self {
        Self { engine }
    }
}
