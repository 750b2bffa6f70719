//! Error types for the persistence layer.
//!
//! Backends classify transport status codes into the two domain sentinels
//! ([`StorageError::NotFound`] and [`StorageError::Conflict`]) and wrap every
//! other failure with the name of the operation that produced it.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No document exists under the identifier.
    #[error("user info not found: {id}")]
    NotFound { id: String },

    /// A document with the identifier already exists.
    #[error("user info already exists: {id}")]
    Conflict { id: String },

    /// The caller-supplied query was rejected before reaching the engine.
    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    /// The record could not be serialized into a request payload.
    #[error("{operation}: marshal: {source}")]
    Serialization {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The engine response could not be decoded into the expected shape.
    #[error("{operation}: decode: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// The call did not complete within the adapter's request timeout.
    #[error("{operation}: timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns `true` for [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// Returns `true` for [`StorageError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict { .. })
    }

    pub(crate) fn decode(operation: &'static str, err: impl std::fmt::Display) -> Self {
        StorageError::Decode {
            operation,
            message: err.to_string(),
        }
    }
}

/// Errors originating in the storage backend or its transport.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend client could not be built or could not connect.
    #[error("failed to connect to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The backend is reachable but not able to serve requests.
    #[error("{backend_name} unavailable: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Any other backend failure, carrying the operation context.
    #[error("{backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
