//! Global application error types and handlers.
//!
//! This module defines the error returned by every API handler and maps store
//! failures onto HTTP status codes, so a missing row, a bad request and a
//! broken database are distinguishable to the client.

use adapters::{StoreError, StoreErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => match err.kind() {
                StoreErrorKind::Constraint => StatusCode::CONFLICT,
                StoreErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
                StoreErrorKind::Query => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        // Driver messages stay in the logs.
        let message = match &self {
            ApiError::Store(err) if err.kind() != StoreErrorKind::Constraint => {
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
