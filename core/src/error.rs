//! Error types for the resource mapping layer.
//!
//! # Design
//! Local failures (schema lookups, path templating, response shape) are
//! raised before or after the round-trip and get their own variants.
//! Everything the transport reports is wrapped in `TransportError` with the
//! original status and body preserved, and is never retried here.

/// Failures reported by the HTTP transport or derived from a non-2xx status.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The server returned 404.
    #[error("not found: {body}")]
    NotFound { body: String },

    /// The server returned 401 or 403.
    #[error("unauthorized ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The server returned 429. `retry_after` is taken from the
    /// `Retry-After` header when present.
    #[error("rate limited (retry after {retry_after:?}s): {body}")]
    RateLimited { retry_after: Option<f64>, body: String },

    /// The server returned a 5xx status.
    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl TransportError {
    /// The HTTP status that produced this error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Network(_) => None,
            TransportError::NotFound { .. } => Some(404),
            TransportError::Unauthorized { status, .. } => Some(*status),
            TransportError::RateLimited { .. } => Some(429),
            TransportError::Server { status, .. } | TransportError::Http { status, .. } => {
                Some(*status)
            }
        }
    }
}

/// Errors returned by schema lookups, instance mutation and resource
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("{resource} has no field named {field}")]
    UnknownField { resource: &'static str, field: String },

    #[error("field {field} of {resource} expects {expected}, got {found}")]
    TypeMismatch {
        resource: &'static str,
        field: String,
        expected: String,
        found: String,
    },

    /// The resource declares no path for the requested operation.
    #[error("{resource} does not support {operation}")]
    UnsupportedOperation {
        resource: &'static str,
        operation: &'static str,
    },

    /// A path placeholder could not be resolved from the call parameters or
    /// the instance.
    #[error("missing path parameter: {0}")]
    MissingParameter(String),

    /// A path parameter that cannot stand as a single URL segment.
    #[error("invalid path parameter {name}: {value:?}")]
    InvalidParameter { name: String, value: String },

    /// The response body did not have the expected root key or type.
    #[error("unexpected response shape for {root_key}: {detail}")]
    UnexpectedShape { root_key: String, detail: String },

    /// A single-resource fetch matched nothing on the server.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Invalid values in environment-driven configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API version {0:?}, expected YYYY-MM or \"unstable\"")]
    InvalidApiVersion(String),

    #[error("invalid scheme {0:?}, expected http or https")]
    InvalidScheme(String),
}
