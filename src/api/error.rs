//! HTTP error mapping for the task API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::tasks::ServiceError;

/// JSON body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable description of the failure.
    pub message: String,
}

/// A service failure carried to the HTTP layer.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl ApiError {
    /// HTTP status for the wrapped failure.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict { .. } | ServiceError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for the wrapped failure.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.0 {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Conflict { .. } => "CONFLICT",
            ServiceError::InvalidRequest(_) => "INVALID_REQUEST",
            ServiceError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ServiceError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            // Store failures keep their detail out of the response body.
            message: match &self.0 {
                ServiceError::Store(_) => "internal server error".to_string(),
                other => other.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
