pub mod auth;
pub mod authz;
pub mod comment;
pub mod engine;
pub mod error;
pub mod ids;
pub mod manuscript;
pub mod person;
pub mod roles;
pub mod state_machine;
pub mod store;
pub mod text;
pub mod validation;

pub use engine::JournalEngine;
pub use error::{JournalError, Result};
