//! # API Error Type
//!
//! Error body for the JSON view routes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Bistro Web                             │
//! │                                                                         │
//! │  POST form routes                   GET JSON views                      │
//! │  ────────────────                   ──────────────                      │
//! │  ValidationError / DbError          DbError                             │
//! │         │                                 │                             │
//! │         ▼                                 ▼                             │
//! │  one-shot error notice              ApiError { code, message }          │
//! │  + 303 redirect                     + matching HTTP status              │
//! │                                                                         │
//! │  Internal detail is logged with tracing, never put in a response.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bistro_db::DbError;
use serde::Serialize;

/// ```json
/// { "code": "DATABASE_UNAVAILABLE", "message": "Ordering is temporarily unavailable, please retry shortly" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Pool closed or saturated; retrying later may work (503).
    DatabaseUnavailable,

    /// Any other storage failure (500).
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        if err.is_unavailable() {
            tracing::warn!(error = %err, "Database unavailable");
            ApiError::new(
                ErrorCode::DatabaseUnavailable,
                "Ordering is temporarily unavailable, please retry shortly",
            )
        } else {
            tracing::error!(error = %err, "Database operation failed");
            ApiError::new(ErrorCode::DatabaseError, "Something went wrong loading this page")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
