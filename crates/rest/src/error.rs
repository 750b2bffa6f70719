//! Error types for the REST API.
//!
//! Every failure leaves the API as `{"message": "<text>"}` with a status code
//! chosen here and nowhere else.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | Conflict | 409 |
//! | InvalidQuery | 400 |
//! | anything else, including NotFound and Timeout | 500 |

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use userinfo_persistence::error::StorageError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// A record with the identifier already exists (HTTP 409).
    Conflict {
        /// The record identifier.
        id: String,
    },

    /// Bad request - unparsable body, missing parameter or rejected query (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The service is not ready to take traffic (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for [`RestError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Conflict { id } => write!(f, "user info already exists: {}", id),
            RestError::BadRequest { message } => write!(f, "bad request: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for RestError {}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable description.
    pub message: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { id } => RestError::Conflict { id },
            StorageError::InvalidQuery { message } => RestError::BadRequest { message },
            e => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for RestError {
    fn from(rejection: QueryRejection) -> Self {
        RestError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for RestError {
    fn from(rejection: PathRejection) -> Self {
        RestError::bad_request(rejection.body_text())
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
