#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Dynamic endpoint proxy client
//!
//! Turns a declarative endpoint map (path to ordered argument names) into a
//! namespaced call graph whose nodes issue form POSTs to a remote API:
//! - Path normalization: `user.account.login` and `/user/account/login/` are
//!   the same endpoint
//! - Call graph mirroring the path hierarchy, with shared prefix nodes
//! - Positional or keyed arguments, translated through the endpoint registry
//! - One POST per call, returned as an eagerly-started [`Deferred`]
//! - Typed rejections: configuration, transport, malformed response, and the
//!   server's own `error` field
//! - Two transports (hyper or blocking `ureq`), chosen at construction
//!
//! # Example
//!
//! ```ignore
//! use api_proxy::ApiClient;
//! use serde_json::json;
//!
//! let client = ApiClient::builder()
//!     .base_url("https://example.com/api/")
//!     .build()?;
//! client.set_endpoint_map([
//!     ("user.login", vec!["email", "password"]),
//!     ("user.logout", vec![]),
//! ]);
//!
//! let user = client.api().get("user").expect("declared above");
//!
//! // Positional: matched against ["email", "password"]
//! let session = user.at("login").unwrap().call(vec![json!("a@b.com"), json!("pw")]).await?;
//!
//! // Keyed: sent as-is
//! let params = json!({"email": "a@b.com", "password": "pw"});
//! let session = user.at("login").unwrap().call(vec![params]).await?;
//!
//! // No arguments
//! user.at("logout").unwrap().call(()).await?;
//! ```

mod client;
mod config;
mod credential;
mod deferred;
mod dispatch;
mod error;
mod graph;
mod manifest;
mod namespace;
mod path;
mod registry;
mod transport;

pub use client::{ApiClient, ApiClientBuilder, Callback};
pub use config::{
    ApiClientConfig, DEFAULT_BASE_URL, DEFAULT_CREDENTIAL_HEADER, DEFAULT_MAX_BODY_SIZE,
    DEFAULT_USER_AGENT, TransportKind,
};
pub use credential::Credential;
pub use deferred::Deferred;
pub use dispatch::Call;
pub use error::ApiError;
pub use manifest::EndpointManifest;
pub use namespace::Namespace;
pub use path::EndpointPath;
pub use registry::EndpointConfig;
pub use transport::{
    BlockingTransport, HyperTransport, Params, RawResponse, Transport, TransportRequest,
};
