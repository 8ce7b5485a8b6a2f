use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

type Cause = Box<dyn StdError + Send + Sync>;

/// Broad category of a failure, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, connection, timeout or non-2xx status. Retryable by the caller.
    TransportFailure,
    /// Upstream answered but the payload does not have the expected shape.
    MalformedResponse,
    /// The local dataset could not be read.
    InternalFault,
    /// A range filter string that is not `{min}-{max}`.
    InvalidRangeSpec,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TransportFailure => "transport failure",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::InternalFault => "internal fault",
            ErrorKind::InvalidRangeSpec => "invalid range",
        };
        f.write_str(name)
    }
}

/// Error returned by the upstream fetchers.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FetchError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Cause>,
}

impl FetchError {
    pub fn transport(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        FetchError {
            kind: ErrorKind::TransportFailure,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        FetchError {
            kind: ErrorKind::MalformedResponse,
            message: message.into(),
            cause: None,
        }
    }

    pub fn malformed_with(message: impl Into<String>, cause: impl Into<Cause>) -> Self {
        FetchError {
            kind: ErrorKind::MalformedResponse,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::TransportFailure
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            ErrorKind::MalformedResponse => {
                "The card service returned data in an unexpected format."
            }
            _ => "Could not reach the card service. Please try again.",
        }
    }
}

/// Failure reading the local dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset has an unexpected shape: {0}")]
    Shape(String),

    #[error("dataset task failed: {0}")]
    Task(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InternalFault
    }
}

/// Malformed `{min}-{max}` input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid range `{input}`, expected MIN-MAX")]
pub struct RangeSpecError {
    pub input: String,
}

impl RangeSpecError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidRangeSpec
    }
}

/// Error surfaced by the proxy routes.
#[derive(Debug)]
pub enum AppError {
    /// Storage fault. The message is what the client sees; the cause is logged.
    Internal(&'static str),
    NotFound,
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        };

        let body = ErrorResponse {
            error: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
