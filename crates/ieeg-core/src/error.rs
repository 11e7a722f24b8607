//! Error types for the ieeg client.
//!
//! Every operation either succeeds with a fully formed value or fails with
//! exactly one [`Error`]. The variants separate transport failures, rejected
//! credentials, missing datasets or layers, other server-side failures,
//! client-side validation and malformed response bodies.

use std::fmt;
use thiserror::Error;

/// The unified error type for ieeg operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No response was received (DNS, TLS, connection, timeout).
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),

    /// The server rejected the credentials (HTTP 401 or 403).
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// The dataset, layer or resource does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Any other non-2xx response. Carries the server body verbatim.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The call was rejected before anything was sent.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A 2xx response whose body could not be understood.
    #[error("malformed response: {0}")]
    Decode(#[from] DecodeError),

    /// The session has been closed.
    #[error("session is closed")]
    Closed,
}

impl Error {
    /// Returns true for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns true for [`Error::Authentication`].
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }
}

/// Transport-level errors: the request produced no HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Any other failure inside the HTTP stack.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Something the caller asked for does not exist on the server.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// No dataset with this name, or the server returned no usable id.
    #[error("dataset '{name}'")]
    Dataset { name: String },

    /// No annotations under this layer name.
    #[error("annotation layer '{name}'")]
    Layer { name: String },

    /// The server answered 404 for another resource.
    #[error("{operation}: {message}")]
    Resource { operation: String, message: String },
}

/// A non-2xx response that is neither an auth failure nor a 404.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Response body as sent by the server.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Client-side validation errors, raised before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A layer name argument was empty.
    #[error("{argument} must not be empty")]
    EmptyLayerName { argument: &'static str },

    /// A sample window with zero duration.
    #[error("duration must be greater than zero")]
    ZeroDuration,

    /// A sample request naming no channels.
    #[error("at least one channel index is required")]
    NoChannels,

    /// A channel index outside the dataset's channel list.
    #[error("channel index {index} out of range (dataset has {count} channels)")]
    ChannelOutOfRange { index: usize, count: usize },

    /// A channel label the dataset does not have.
    #[error("unknown channel label '{label}'")]
    UnknownChannel { label: String },

    /// An empty annotation batch.
    #[error("annotation batch is empty")]
    EmptyBatch,

    /// Connection configuration that cannot form a URL.
    #[error("invalid connection configuration '{value}': {reason}")]
    Config { value: String, reason: String },
}

/// A successful response whose body could not be parsed.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The time-series details document is not well-formed XML.
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A required element or attribute is missing.
    #[error("missing {element} in {context}")]
    MissingElement { element: String, context: String },

    /// A numeric field did not parse.
    #[error("invalid number for {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    /// A JSON body did not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A sample row with the wrong number of columns.
    #[error("sample row {row} has {found} values, expected {expected}")]
    SampleShape {
        row: usize,
        expected: usize,
        found: usize,
    },
}
