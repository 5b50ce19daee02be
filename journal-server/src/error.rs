//! Maps `JournalError` kinds to HTTP status codes. Every domain
//! error propagates here with its kind preserved; nothing is swallowed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use journal_core::JournalError;
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(pub JournalError);

impl From<JournalError> for ApiError {
    fn from(e: JournalError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            JournalError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            JournalError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            JournalError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            JournalError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "unauthenticated".to_string())
            }
            JournalError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            JournalError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
