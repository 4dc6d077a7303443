//! HTTP error responses.
//!
//! Client failures render as `{"error": "<ErrorCode>"}`; anything else is
//! logged and rendered as `{"error": "Internal"}` with 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mercy_core::{EntityKind, ErrorCode};
use mercy_runtime::{CreateError, PasswordError, ResolveError, UpdateError};
use mercy_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{code} ({status})")]
    Rejected { code: ErrorCode, status: StatusCode },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Reject with the code's usual status.
    pub fn new(code: ErrorCode) -> Self {
        let status =
            StatusCode::from_u16(code.default_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::Rejected { code, status }
    }

    pub fn with_status(code: ErrorCode, status: StatusCode) -> Self {
        Self::Rejected { code, status }
    }

    /// Authentication failure: always 401, whatever the code.
    pub fn unauthorized(code: ErrorCode) -> Self {
        Self::with_status(code, StatusCode::UNAUTHORIZED)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { code, .. } => *code,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn resolve(kind: EntityKind, err: ResolveError) -> Self {
        match err.code(kind) {
            Some(code) => Self::new(code),
            None => Self::Internal(err.into()),
        }
    }

    pub fn update(kind: EntityKind, err: UpdateError) -> Self {
        match err.code(kind) {
            Some(code) if matches!(err, UpdateError::StudentNotFound(_)) => {
                Self::with_status(code, StatusCode::BAD_REQUEST)
            }
            Some(code) => Self::new(code),
            None => Self::Internal(err.into()),
        }
    }

    pub fn create(kind: EntityKind, err: CreateError) -> Self {
        match err.code(kind) {
            // The request was bad, not the route
            Some(code) if matches!(err, CreateError::StudentNotFound(_)) => {
                Self::with_status(code, StatusCode::BAD_REQUEST)
            }
            Some(code) => Self::new(code),
            None => Self::Internal(err.into()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, "Request failed");
        }
        let body = Json(json!({ "error": self.code() }));
        (self.status(), body).into_response()
    }
}
