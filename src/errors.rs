//! # Error Handling for the Query Engine
//!
//! Two failure classes matter here:
//!
//! - **Malformed parameters** (bad `or` triples, non-numeric `start`/`limit`,
//!   unknown operator tokens, invalid `regex` patterns) are rejected before
//!   any storage call and surfaced as 400 responses naming the offending
//!   parameter.
//! - **Storage failures** during count or fetch become 500 responses with a
//!   generic body; the internal detail is logged via `tracing` and never
//!   serialized, so no filter structure leaks to clients.
//!
//! Internal errors are logged using the `tracing` crate; nothing is emitted
//! unless the application has installed a subscriber.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

/// API error type with automatic logging and sanitized responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - a malformed query parameter, rejected before any
    /// storage call.
    BadRequest {
        /// User-facing message naming the offending parameter.
        message: String,
    },

    /// 500 Internal Server Error - storage collaborator failure
    /// (details logged, not exposed).
    Storage {
        /// User-facing generic message.
        message: String,
        /// Internal error (logged, not sent to the user).
        internal: StoreError,
    },

    /// 500 Internal Server Error - generic internal error.
    Internal {
        /// User-facing generic message.
        message: String,
        /// Internal error details (logged, not sent to the user).
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error.
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::bad_request("parameter `limit` must be a positive integer"));
    /// ```
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 500 error from a storage failure.
    ///
    /// The storage error details are logged but NOT sent to the user.
    ///
    /// # Example
    /// ```rust,ignore
    /// let total = store.count(None).await.map_err(ApiError::storage)?;
    /// ```
    pub fn storage(err: StoreError) -> Self {
        Self::Storage {
            message: "A storage error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error with optional details.
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Storage { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized).
    fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Storage { message, .. }
            | Self::Internal { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to the user).
    fn log_internal(&self) {
        match self {
            Self::Storage { internal, .. } => {
                tracing::error!(error = ?internal, "Storage error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized).
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::storage(err)
    }
}
