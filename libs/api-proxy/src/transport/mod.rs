//! Single-POST transport seam and response interpretation.
//!
//! A [`Transport`] only moves bytes: it posts a form body and hands back the
//! status and raw body. Turning that into a fulfilled value or a typed
//! rejection is shared by every implementation via [`interpret_response`].

mod blocking;
mod hyper_client;

pub use blocking::BlockingTransport;
pub use hyper_client::HyperTransport;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::credential::Credential;
use crate::error::ApiError;

/// Flat parameter set for one endpoint call
pub type Params = serde_json::Map<String, Value>;

/// One outbound form POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Absolute URL: base URL followed by the canonical endpoint path
    pub url: String,
    /// Form fields in body order
    pub fields: Vec<(String, String)>,
    /// Credential to attach, if one is configured
    pub credential: Option<Credential>,
}

/// Status and body of a completed POST.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Sends exactly one POST per call.
///
/// Implementations must not retry, and must return `Ok` for every HTTP
/// status; only network-level failures are errors here.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns a transport-family [`ApiError`] when the request cannot be
    /// built or the exchange fails before a full response body is read.
    async fn post_form(&self, request: TransportRequest) -> Result<RawResponse, ApiError>;
}

/// Build form fields from an optional parameter set.
///
/// Strings go through verbatim, `null` becomes an empty value, numbers and
/// booleans use their JSON text and arrays or objects are sent as compact
/// JSON.
#[must_use]
pub fn form_fields(params: Option<&Params>) -> Vec<(String, String)> {
    params
        .map(|params| {
            params
                .iter()
                .map(|(key, value)| (key.clone(), stringify(value)))
                .collect()
        })
        .unwrap_or_default()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Map a raw response to the deferred result's outcome.
///
/// The HTTP status plays no part: every completed exchange is judged by its
/// body alone.
/// - not JSON, or JSON `null`: [`ApiError::MalformedResponse`]
/// - JSON with a truthy `error` field: [`ApiError::Application`]
/// - any other JSON value: fulfilled with the parsed value
///
/// # Errors
///
/// See the list above.
pub fn interpret_response(response: &RawResponse) -> Result<Value, ApiError> {
    let value =
        serde_json::from_slice::<Value>(&response.body).map_err(ApiError::MalformedResponse)?;

    if value.is_null() {
        return Err(ApiError::MalformedResponse(serde::de::Error::custom(
            "response body is JSON null",
        )));
    }
    if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
        return Err(ApiError::Application(error.clone()));
    }

    tracing::trace!(status = response.status, "endpoint response accepted");
    Ok(value)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
