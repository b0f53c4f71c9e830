use serde::Deserialize;

/// Default base URL, matching the stock API servlet mount point
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";

/// Default User-Agent string for endpoint calls
pub const DEFAULT_USER_AGENT: &str = concat!("api-proxy/", env!("CARGO_PKG_VERSION"));

/// Default response body limit (10 MiB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default header carrying the credential as `Bearer <credential>`
pub const DEFAULT_CREDENTIAL_HEADER: &str = "authorization";

/// Which transport implementation the client constructs.
///
/// Chosen once when the client is built; the other implementation is never
/// instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Non-blocking hyper client on the tokio runtime
    #[default]
    Async,
    /// Blocking `ureq` agent driven from tokio's blocking pool
    Blocking,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Async => "async",
            TransportKind::Blocking => "blocking",
        }
    }
}

/// Endpoint client configuration.
///
/// Every field has a default, so a partial document deserializes:
///
/// ```ignore
/// let config: ApiClientConfig = serde_json::from_str(r#"{"base_url": "https://example.com/api/"}"#)?;
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiClientConfig {
    /// Prefix prepended verbatim to every canonical endpoint path
    pub base_url: String,

    /// Transport implementation (default: `async`)
    pub transport: TransportKind,

    /// User-Agent header value
    pub user_agent: String,

    /// Maximum accepted response body, in bytes
    pub max_body_size: usize,

    /// Header name used to send the credential
    pub credential_header: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            transport: TransportKind::default(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_owned(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.transport, TransportKind::Async);
        assert!(config.user_agent.starts_with("api-proxy/"));
        assert_eq!(config.max_body_size, 10 * 1024 * 1024);
        assert_eq!(config.credential_header, "authorization");
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: ApiClientConfig = serde_json::from_str(
            r#"{"base_url": "https://example.com/api/", "transport": "blocking"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://example.com/api/");
        assert_eq!(config.transport, TransportKind::Blocking);
        assert_eq!(config.max_body_size, DEFAULT_MAX_BODY_SIZE);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = serde_json::from_str::<ApiClientConfig>(r#"{"retries": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_transport_rejected() {
        let result = serde_json::from_str::<ApiClientConfig>(r#"{"transport": "xhr"}"#);
        assert!(result.is_err());
    }
}
