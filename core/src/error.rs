//! Error types for the poster.
//!
//! # Design
//! Transport failures get their own enum so a failed exchange can never be
//! mistaken for an empty success: a request either yields a full
//! `HttpResponse` or one of these reasons. `PostError` wraps it together with
//! the failures that happen before any I/O and the optional strict status
//! check.

use thiserror::Error;

/// A failure below the HTTP semantic layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS lookup, refused connection, reset, or timeout from the OS.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The TLS handshake or certificate verification failed.
    #[error("TLS failed: {0}")]
    TlsFailed(String),

    /// The peer answered with something that is not valid HTTP.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The HTTP client refused to send the request at all.
    #[error("request rejected before sending: {0}")]
    RequestRejected(String),

    /// A client failure that fits none of the above.
    #[error("transport error: {0}")]
    Other(String),
}

/// Errors returned by the poster operations.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("host must not be empty")]
    EmptyHost,

    /// The payload argument is not valid JSON.
    #[error("Payload must be a valid JSON string ({0})")]
    InvalidPayload(String),

    /// A header name or value cannot be sent, e.g. a token with a newline.
    #[error("invalid header {0}")]
    InvalidHeader(String),

    /// The payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-200 status under `StatusPolicy::RequireOk`.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
}
