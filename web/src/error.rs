//! Rejection type for decode failures.
//!
//! This module maps [`DecodeError`]s and axum's own extraction failures
//! onto HTTP responses, implementing Axum's `IntoResponse` trait.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use magic_decoder_core::DecodeError;
use serde::Serialize;
use std::fmt;

/// Rejection returned when a request cannot be decoded into a record.
///
/// Data errors (bad parameters, bad bodies) become `400 Bad Request`. A
/// missing decode target is a programming error and becomes `500`.
///
/// # Examples
///
/// ```ignore
/// async fn handler(Magic(item): Magic<Item>) -> Json<Item> {
///     Json(item)
/// }
///
/// // A request with `?page=two` for a `u32` field is answered with
/// // 400 {"code": "INVALID_PARAMETER", "message": "..."}
/// ```
#[derive(Debug)]
pub struct DecodeRejection {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Underlying decode error, if any
    source: Option<DecodeError>,
}

impl DecodeRejection {
    /// Create a new rejection.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Wrap a rejection produced by one of axum's own extractors.
    #[must_use]
    pub fn extraction(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message.into(), "EXTRACTION_FAILED")
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DecodeError> for DecodeRejection {
    fn from(err: DecodeError) -> Self {
        let (status, code) = match &err {
            DecodeError::InvalidTarget(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INVALID_TARGET"),
            DecodeError::Parse { .. } => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            DecodeError::EmptyBody => (StatusCode::BAD_REQUEST, "EMPTY_BODY"),
            DecodeError::MalformedBody(_) => (StatusCode::BAD_REQUEST, "MALFORMED_BODY"),
            DecodeError::BodyField { .. } => (StatusCode::BAD_REQUEST, "INVALID_BODY_FIELD"),
        };

        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "An internal error occurred".to_string()
        };

        Self {
            status,
            message,
            code,
            source: Some(err),
        }
    }
}

impl fmt::Display for DecodeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for DecodeRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for DecodeRejection {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    error = %source,
                    "Request decoding failed"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Request decoding failed"
                );
            }
        } else {
            tracing::warn!(
                status = %self.status,
                code = self.code,
                message = %self.message,
                "Rejected request"
            );
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}
