use thiserror::Error;

/// Errors raised while talking to the Kibana console proxy or writing dump output.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request never completed (connection refused, TLS failure, timeout...).
    #[error("request to proxy path '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The proxy answered, but not with a 2xx status.
    #[error("proxy returned status {status} for path '{path}': {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("malformed response for proxy path '{path}': {reason}")]
    MalformedResponse { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid raw query: {0}")]
    InvalidQuery(String),

    #[error("{0}")]
    Usage(String),
}

impl RelayError {
    pub fn malformed(path: &str, reason: impl Into<String>) -> Self {
        RelayError::MalformedResponse {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures that happened on the wire rather than in the payload.
    pub fn is_transport(&self) -> bool {
        matches!(self, RelayError::Transport { .. } | RelayError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
