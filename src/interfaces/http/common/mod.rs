//! Shared HTTP types: the JSON error body and the `ApiError` wrapper that
//! maps domain failures onto status codes.

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// JSON body returned on every failure path.
///
/// `message` is the human-readable description; `error` carries the
/// underlying cause when one exists. Stack traces are never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// API error with status code. Handlers return `Result<_, ApiError>` and
/// let `?` convert domain failures at the boundary.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                error: None,
            },
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.body.error = Some(detail.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { .. } => Self::not_found(err.to_string()),
            // Deliberately indistinguishable from NotFound for callers: the
            // row was gone by the time the write ran.
            DomainError::ConcurrencyConflict { entity, id } => {
                Self::not_found(format!("Not found: {} with id={}", entity, id))
            }
            DomainError::Validation(msg) => Self::bad_request(msg.clone()),
            DomainError::Storage(msg) => {
                Self::internal("Internal server error").with_detail(msg.clone())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body.message)
    }
}

impl std::error::Error for ApiError {}

// ── Tests ──────────────────────────────────────────────────────
