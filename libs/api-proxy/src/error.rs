use thiserror::Error;

/// Errors surfaced through a [`Deferred`](crate::Deferred) rejection or at client construction.
///
/// The variants fall into four families:
/// - configuration: [`ApiError::MissingArgNames`], raised before any network I/O
/// - transport: network, URL, header and body-limit failures
/// - response format: [`ApiError::MalformedResponse`]
/// - application: [`ApiError::Application`], the server's `error` field verbatim
///
/// Use the `is_*` predicates for programmatic matching; message strings are
/// not stable.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// Positional arguments were given but the endpoint has no argument names registered
    #[error("Missing endpoint named parameters configuration for: {path}")]
    MissingArgNames { path: String },

    /// Response body is not valid JSON, or is JSON `null`
    #[error("Request failed: invalid JSON response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// Response parsed fine but carries a truthy `error` field
    #[error("Endpoint returned an error: {0}")]
    Application(serde_json::Value),

    /// Transport error (network, connection, aborted task, etc)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body exceeded the configured limit
    #[error("Response body too large: limit {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Base URL + endpoint path did not form a valid URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri { url: String, reason: String },

    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Invalid header name
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Form URL encoding error
    #[error("Form encoding failed: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// Endpoint manifest could not be parsed
    #[error("Invalid endpoint manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    /// Client configuration rejected at build time
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// True for the pre-flight named-argument configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::MissingArgNames { .. })
    }

    /// True for network, URL, header and body-limit failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_)
                | ApiError::BodyTooLarge { .. }
                | ApiError::InvalidUri { .. }
                | ApiError::RequestBuild(_)
                | ApiError::InvalidHeaderName(_)
                | ApiError::InvalidHeaderValue(_)
                | ApiError::FormEncode(_)
        )
    }

    /// True when the response body was not parseable JSON.
    #[must_use]
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, ApiError::MalformedResponse(_))
    }

    /// True when the server reported an application-level `error`.
    #[must_use]
    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application(_))
    }

    /// The server's `error` value, if this is an application error.
    #[must_use]
    pub fn application_value(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Application(value) => Some(value),
            _ => None,
        }
    }
}

impl From<hyper_util::client::legacy::Error> for ApiError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}
