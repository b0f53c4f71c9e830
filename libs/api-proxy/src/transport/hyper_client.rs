use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::{Method, Request};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

use super::{RawResponse, Transport, TransportRequest};
use crate::config::ApiClientConfig;
use crate::error::ApiError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Async transport on a pooled hyper client.
///
/// Both `http://` and `https://` base URLs are accepted; TLS uses the
/// webpki root set. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    user_agent: HeaderValue,
    credential_header: HeaderName,
    max_body_size: usize,
}

impl HyperTransport {
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the TLS provider cannot be set up, or a
    /// header error if the configured User-Agent or credential header name
    /// is not a valid header.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        let provider = rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| ApiError::Config(format!("TLS setup failed: {e}")))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build::<_, Full<Bytes>>(https);

        Ok(Self {
            client,
            user_agent: HeaderValue::try_from(config.user_agent.as_str())?,
            credential_header: HeaderName::try_from(config.credential_header.as_str())?,
            max_body_size: config.max_body_size,
        })
    }

    fn build_request(&self, request: &TransportRequest) -> Result<Request<Full<Bytes>>, ApiError> {
        let uri: http::Uri = request
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ApiError::InvalidUri {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;
        if uri.authority().is_none() {
            return Err(ApiError::InvalidUri {
                url: request.url.clone(),
                reason: "missing host/authority".to_owned(),
            });
        }

        let body = serde_urlencoded::to_string(&request.fields)?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(USER_AGENT, self.user_agent.clone());

        if let Some(credential) = &request.credential {
            let mut value = HeaderValue::from_str(&credential.bearer())?;
            value.set_sensitive(true);
            builder = builder.header(self.credential_header.clone(), value);
        }

        Ok(builder.body(Full::new(Bytes::from(body)))?)
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn post_form(&self, request: TransportRequest) -> Result<RawResponse, ApiError> {
        let http_request = self.build_request(&request)?;
        let response = self.client.request(http_request).await?;
        let status = response.status().as_u16();

        let limit = self.max_body_size;
        let body = Limited::new(response.into_body(), limit)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    ApiError::BodyTooLarge { limit }
                } else {
                    ApiError::Transport(e)
                }
            })?
            .to_bytes();

        tracing::trace!(url = %request.url, status, bytes = body.len(), "endpoint response received");
        Ok(RawResponse { status, body })
    }
}
