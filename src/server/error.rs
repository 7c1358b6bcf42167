//! HTTP-facing error type.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use super::structured_error::StructuredError;
use crate::ordering::OrderingError;
use crate::store::StoreError;

/// Errors a handler can return.
///
/// Persistence failures are logged in full but reported to clients with a
/// generic message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid bearer token")]
    Unauthenticated,

    #[error("Caller is not a member of workspace {0}")]
    Forbidden(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Field '{0}' must not be empty")]
    EmptyName(&'static str),

    #[error("Item {0} is a subitem and cannot have subitems")]
    NestedSubitem(String),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error(transparent)]
    Store(StoreError),
}

impl ApiError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// - Unauthenticated: 401
    /// - Forbidden: 403
    /// - NotFound: 404
    /// - Payload and ordering validation: 400
    /// - Revision mismatch: 409
    /// - Anything else from the store: 500
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store(StoreError::RevisionMismatch { .. }) => StatusCode::CONFLICT,
            Self::Ordering(OrderingError::PositionOverflow(_)) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidPayload(_)
            | Self::EmptyName(_)
            | Self::NestedSubitem(_)
            | Self::Ordering(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Ordering(e) => ApiError::Ordering(e),
            other => ApiError::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status.is_server_error() {
            error!(error = %self, "Request failed");
            StructuredError::from_parts(&self, "Failed to persist changes".to_string())
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
            StructuredError::from_error(&self)
        };

        (status, Json(body)).into_response()
    }
}
