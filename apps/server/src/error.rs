// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use facegen_processing::{CatalogError, UploadError, UpstreamError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid document: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] facegen_processing::Error),

    #[error("Storage error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Upload(UploadError::Store(_)) | ApiError::Upload(UploadError::Serialize(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPLOAD_FAILED")
            }
            ApiError::Upload(UploadError::AlreadyExists) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            ApiError::Upload(_) => (StatusCode::BAD_REQUEST, "INVALID_MODEL"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Pipeline(facegen_processing::Error::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Pipeline(facegen_processing::Error::MissingDestination { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_DESTINATION")
            }
            ApiError::Pipeline(facegen_processing::Error::Upstream(UpstreamError::NotFound { .. }))
            | ApiError::Upstream(UpstreamError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ApiError::Pipeline(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PIPELINE_ERROR"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(name) => ApiError::NotFound(name),
            CatalogError::Malformed(e) => ApiError::Internal(format!("JSON error: {}", e)),
            CatalogError::Upstream(e) => ApiError::Upstream(e),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(ValidationError::MissingPayload).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(UploadError::InvalidUnits).status_and_code(),
            (StatusCode::BAD_REQUEST, "INVALID_MODEL")
        );
        assert_eq!(
            ApiError::from(CatalogError::NotFound("x".into())).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(facegen_processing::Error::MissingDestination { key: "k".into() })
                .status_and_code()
                .0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
