//! journal-server — REST surface for the journal editorial backend.
//!
//! Reads config from env vars/CLI flags (see `config`), and delegates every
//! route handler to a `journal_core::JournalEngine` (see `state::AppState`).

pub mod auth_extractor;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
