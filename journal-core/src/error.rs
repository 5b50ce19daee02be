//! Domain error kinds. The transport layer (journal-server) maps each variant
//! to a status code; no variant is ever swallowed by the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, JournalError>;

impl JournalError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        JournalError::InvalidArgument(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        JournalError::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        JournalError::Conflict(msg.into())
    }
}
