//! Response types for the payroll API.
//!
//! Every error the API returns is a JSON object with a `status`
//! discriminator, never a bare string or a stack trace.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Value of the `status` field on error bodies.
pub const STATUS_ERROR: &str = "error";

/// Value of the `status` field on health responses.
pub const STATUS_OK: &str = "ok";

/// Body of the health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Server time, RFC 3339.
    pub timestamp: String,
}

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable error message.
    pub error_message: String,
    /// The uploaded filename the error relates to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            error_message: error_message.into(),
            filename: None,
        }
    }

    /// Creates a new API error naming the uploaded file.
    pub fn for_file(error_message: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::new(error_message)
        }
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a response from a status and message.
    pub fn new(status: StatusCode, error_message: impl Into<String>) -> Self {
        Self {
            status,
            error: ApiError::new(error_message),
        }
    }

    /// Attaches the uploaded filename unless one is already set.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        if self.error.filename.is_none() {
            self.error.filename = Some(filename.into());
        }
        self
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotAPdf { ref filename } | ServiceError::EmptyUpload { ref filename } => {
                ApiErrorResponse {
                    status: StatusCode::BAD_REQUEST,
                    error: ApiError::for_file(error.to_string(), filename.clone()),
                }
            }
            ServiceError::MissingFileField { .. } => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, error.to_string())
            }
            ServiceError::MalformedUpload { status, message } => ApiErrorResponse::new(
                StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_REQUEST),
                message,
            ),
            ServiceError::ExtractorFailed { ref stderr, .. } if !stderr.is_empty() => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Unexpected error: {}", stderr),
                )
            }
            other => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unexpected error: {}", other),
            ),
        }
    }
}
