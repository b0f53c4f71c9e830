use std::io::Read;

use async_trait::async_trait;
use bytes::Bytes;

use super::{RawResponse, Transport, TransportRequest};
use crate::config::ApiClientConfig;
use crate::error::ApiError;

/// Blocking `ureq` transport, run on tokio's blocking pool.
///
/// Suitable where a synchronous HTTP stack is preferred; each call occupies
/// one blocking thread for the duration of the exchange.
#[derive(Clone)]
pub struct BlockingTransport {
    agent: ureq::Agent,
    credential_header: String,
    max_body_size: usize,
}

impl BlockingTransport {
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeaderName`] if the credential header name
    /// is not a valid HTTP header name.
    pub fn new(config: &ApiClientConfig) -> Result<Self, ApiError> {
        // ureq accepts any string as a header name and fails late; validate up front.
        http::header::HeaderName::try_from(config.credential_header.as_str())?;

        let agent = ureq::AgentBuilder::new()
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            agent,
            credential_header: config.credential_header.clone(),
            max_body_size: config.max_body_size,
        })
    }

    fn post_blocking(&self, request: &TransportRequest) -> Result<RawResponse, ApiError> {
        let mut call = self.agent.post(&request.url);
        if let Some(credential) = &request.credential {
            call = call.set(&self.credential_header, &credential.bearer());
        }

        let fields: Vec<(&str, &str)> = request
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        // ureq reports 4xx/5xx as Error::Status; the body is still wanted.
        let response = match call.send_form(&fields) {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(ApiError::Transport(Box::new(transport)));
            }
        };

        let status = response.status();
        let limit = self.max_body_size;
        let read_cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);

        let mut body = Vec::new();
        response
            .into_reader()
            .take(read_cap)
            .read_to_end(&mut body)
            .map_err(|e| ApiError::Transport(Box::new(e)))?;
        if body.len() > limit {
            return Err(ApiError::BodyTooLarge { limit });
        }

        Ok(RawResponse {
            status,
            body: Bytes::from(body),
        })
    }
}

#[async_trait]
impl Transport for BlockingTransport {
    async fn post_form(&self, request: TransportRequest) -> Result<RawResponse, ApiError> {
        let transport = self.clone();
        tokio::task::spawn_blocking(move || transport.post_blocking(&request))
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?
    }
}
