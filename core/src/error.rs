//! Error types for the messaging API client.
//!
//! # Design
//! `MissingParameter` is raised by the builder before any I/O happens. Every
//! other failure comes out of, or after, the transport round-trip: the
//! transport's own error is carried untouched in `Transport`, and the
//! response-side variants mirror the status handling of the parse step.
//! `NotFound` gets a dedicated variant because callers frequently branch on
//! "the resource does not exist".

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `MessagingClient` and `Messaging`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was not supplied.
    #[error("missing required parameter: \"{0}\"")]
    MissingParameter(&'static str),

    /// No operation with this name exists in the operation table.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The configured endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(#[source] TransportError),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// Caller-supplied options could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// True for failures raised by or after the transport call, as opposed to
    /// argument or configuration problems caught before any I/O.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_)
                | ApiError::NotFound
                | ApiError::HttpError { .. }
                | ApiError::DeserializationError(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
