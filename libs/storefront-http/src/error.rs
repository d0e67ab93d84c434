use thiserror::Error;

/// Classification of URL validation failures.
///
/// Provides programmatic matching for different failure modes without
/// relying on unstable error message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// URL could not be parsed (malformed syntax)
    ParseError,
    /// URL is missing required host/authority component
    MissingAuthority,
    /// URL is missing required scheme (http/https)
    MissingScheme,
}

/// Where in the request lifecycle an [`HttpError`] originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// The request could not be built; nothing was sent.
    Build,
    /// The request was (or may have been) sent but a complete answer never
    /// arrived.
    Transport,
}

/// HTTP client error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Request timed out
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Transport error (network, connection, etc)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// TLS configuration error
    #[error("TLS error: {0}")]
    Tls(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body exceeded size limit
    #[error("Response body too large: limit {limit} bytes, got {actual} bytes")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Request body could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Too many requests in flight (buffer full, fail-fast)
    #[error("Service overloaded: request buffer is full")]
    Overloaded,

    /// Internal service failure (buffer worker died, channel closed)
    #[error("Service unavailable: internal failure")]
    ServiceClosed,

    /// Invalid URL (failed to parse)
    ///
    /// Use the `kind` field for programmatic matching; `reason` is for logs.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    /// Invalid URL scheme for transport security configuration
    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// Lifecycle stage this error belongs to.
    ///
    /// Body reads report `BodyTooLarge` and `Timeout` as `Transport`: the
    /// caller already holds the status, but the body did not arrive whole.
    #[must_use]
    pub fn stage(&self) -> ErrorStage {
        match self {
            HttpError::RequestBuild(_)
            | HttpError::InvalidHeaderValue(_)
            | HttpError::Tls(_)
            | HttpError::Json(_)
            | HttpError::InvalidUri { .. }
            | HttpError::InvalidScheme { .. } => ErrorStage::Build,
            HttpError::Timeout(_)
            | HttpError::Transport(_)
            | HttpError::Overloaded
            | HttpError::ServiceClosed
            | HttpError::BodyTooLarge { .. } => ErrorStage::Transport,
        }
    }
}
