use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::{ApiClientConfig, TransportKind};
use crate::credential::Credential;
use crate::deferred::Deferred;
use crate::dispatch::{self, Call};
use crate::error::ApiError;
use crate::graph::Node;
use crate::manifest::EndpointManifest;
use crate::namespace::Namespace;
use crate::path::EndpointPath;
use crate::registry::{EndpointConfig, EndpointRegistry};
use crate::transport::{
    BlockingTransport, HyperTransport, Params, Transport, TransportRequest, form_fields,
    interpret_response,
};

/// Success callback for the callback-style call variants
pub type Callback = Box<dyn FnOnce(&Value) + Send + 'static>;

/// Everything one client owns: registry, call graph, live configuration and
/// the selected transport. Shared by every handle cloned from the client.
pub struct ClientState {
    registry: RwLock<EndpointRegistry>,
    root: Arc<Node>,
    base_url: RwLock<String>,
    credential: RwLock<Option<Credential>>,
    transport: Arc<dyn Transport>,
}

impl ClientState {
    fn register(&self, path: EndpointPath, config: EndpointConfig) {
        tracing::debug!(
            path = %path,
            arg_count = config.arg_names().len(),
            "registering endpoint"
        );
        self.root.ensure_path(&path);
        self.registry.write().register(path, config);
    }

    pub fn is_registered(&self, path: &EndpointPath) -> bool {
        self.registry.read().contains(path.as_str())
    }

    /// Resolve the call shape and hand the parameters to the transport.
    pub fn dispatch(&self, path: EndpointPath, call: Call, callback: Option<Callback>) -> Deferred {
        let resolved = dispatch::resolve(&self.registry.read(), &path, call);
        match resolved {
            Ok(params) => self.send(&path, params.as_ref(), callback),
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "endpoint call rejected before sending");
                Deferred::rejected(err)
            }
        }
    }

    fn send(&self, path: &EndpointPath, params: Option<&Params>, callback: Option<Callback>) -> Deferred {
        let request = TransportRequest {
            url: format!("{}{}", self.base_url.read(), path),
            fields: form_fields(params),
            credential: self.credential.read().clone(),
        };
        let transport = Arc::clone(&self.transport);
        let path = path.clone();

        Deferred::spawn(async move {
            let raw = transport.post_form(request).await.inspect_err(|err| {
                tracing::warn!(path = %path, error = %err, "endpoint request failed");
            })?;
            let value = interpret_response(&raw)?;
            if let Some(callback) = callback
                && catch_unwind(AssertUnwindSafe(|| callback(&value))).is_err()
            {
                tracing::error!(path = %path, "endpoint callback panicked; result kept");
            }
            Ok(value)
        })
    }
}

/// Dynamic endpoint client.
///
/// Endpoints are declared with [`set_endpoint`](Self::set_endpoint) or in
/// bulk from a manifest; each declaration extends the call graph reachable
/// from [`api`](Self::api). `ApiClient` is `Clone + Send + Sync` and clones
/// share all state.
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::builder().base_url("https://example.com/api/").build()?;
/// client.set_endpoint_map([("user.login", vec!["email", "password"])]);
///
/// let session = client
///     .api()
///     .at("user/login")
///     .expect("registered above")
///     .call(vec![json!("alice@example.com"), json!("hunter2")])
///     .await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    state: Arc<ClientState>,
}

impl ApiClient {
    /// Create a client with default configuration and the async transport.
    ///
    /// # Errors
    /// Returns an error if the transport cannot be constructed
    pub fn new() -> Result<Self, ApiError> {
        ApiClientBuilder::new().build()
    }

    /// # Errors
    /// Returns an error if the configured transport cannot be constructed
    pub fn from_config(config: ApiClientConfig) -> Result<Self, ApiError> {
        ApiClientBuilder::with_config(config).build()
    }

    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// Declare one endpoint.
    ///
    /// `path` may use `.` or `/`; it is normalized first. Any previous
    /// declaration of the same path is replaced wholesale, while the call
    /// graph nodes along the path are created once and reused.
    pub fn set_endpoint<I, S>(&self, path: &str, arg_names: I, extra: Option<Params>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = EndpointConfig::new(arg_names).with_extra(extra.unwrap_or_default());
        self.state.register(EndpointPath::normalize(path), config);
    }

    /// Declare many endpoints from `(path, arg_names)` pairs.
    pub fn set_endpoint_map<I, K, N, S>(&self, map: I)
    where
        I: IntoIterator<Item = (K, N)>,
        K: AsRef<str>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (path, arg_names) in map {
            self.set_endpoint(path.as_ref(), arg_names, None);
        }
    }

    pub fn load_manifest(&self, manifest: &EndpointManifest) {
        self.set_endpoint_map(
            manifest
                .iter()
                .map(|(path, names)| (path, names.iter().cloned())),
        );
    }

    /// Parse a JSON manifest and declare its endpoints.
    ///
    /// Returns the number of entries loaded.
    ///
    /// # Errors
    /// Returns [`ApiError::Manifest`] if the document cannot be parsed; no
    /// endpoints are declared in that case.
    pub fn load_manifest_json(&self, json: &str) -> Result<usize, ApiError> {
        let manifest = EndpointManifest::from_json(json)?;
        self.load_manifest(&manifest);
        Ok(manifest.len())
    }

    /// Registered configuration for `path` (either spelling).
    #[must_use]
    pub fn endpoint_config(&self, path: &str) -> Option<Arc<EndpointConfig>> {
        self.state
            .registry
            .read()
            .lookup(EndpointPath::normalize(path).as_str())
    }

    /// All declared endpoint paths, sorted.
    #[must_use]
    pub fn endpoints(&self) -> Vec<EndpointPath> {
        self.state.registry.read().paths()
    }

    /// Root of the call graph.
    #[must_use]
    pub fn api(&self) -> Namespace {
        Namespace::new(Arc::clone(&self.state), Arc::clone(&self.state.root))
    }

    /// Call an endpoint by raw path, without walking the graph.
    ///
    /// The path need not have been declared unless `call` is positional.
    /// Sending needs a tokio runtime; called outside one, the result is
    /// [`ApiError::Transport`]. A configuration rejection is reported either way.
    pub fn call_endpoint(&self, path: &str, call: impl Into<Call>) -> Deferred {
        self.state
            .dispatch(EndpointPath::normalize(path), call.into(), None)
    }

    /// [`call_endpoint`](Self::call_endpoint) that also hands the fulfilled
    /// value to `callback`. Rejections skip the callback. A panicking
    /// callback is logged and the fulfilled value is still returned.
    pub fn call_endpoint_with<F>(&self, path: &str, call: impl Into<Call>, callback: F) -> Deferred
    where
        F: FnOnce(&Value) + Send + 'static,
    {
        self.state.dispatch(
            EndpointPath::normalize(path),
            call.into(),
            Some(Box::new(callback)),
        )
    }

    /// Post `params` to `path` directly, bypassing argument translation.
    pub fn send(&self, path: &str, params: Option<&Params>) -> Deferred {
        self.state.send(&EndpointPath::normalize(path), params, None)
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.state.base_url.read().clone()
    }

    /// Replace the base URL and return the value now in effect.
    ///
    /// An empty value leaves the current base URL unchanged.
    #[allow(clippy::must_use_candidate)]
    pub fn set_base_url(&self, value: impl Into<String>) -> String {
        let value = value.into();
        let mut base_url = self.state.base_url.write();
        if !value.is_empty() {
            tracing::info!(base_url = %value, "api base URL changed");
            *base_url = value;
        }
        base_url.clone()
    }

    /// Set the credential sent with every subsequent request.
    ///
    /// There is deliberately no getter. An empty value is ignored.
    pub fn set_credential(&self, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        tracing::info!("api credential set");
        *self.state.credential.write() = Some(Credential::new(value));
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ApiClientConfig,
    transport: Option<Arc<dyn Transport>>,
    credential: Option<Credential>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ApiClientConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ApiClientConfig) -> Self {
        Self {
            config,
            transport: None,
            credential: None,
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn transport(mut self, kind: TransportKind) -> Self {
        self.config.transport = kind;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn credential_header(mut self, header: impl Into<String>) -> Self {
        self.config.credential_header = header.into();
        self
    }

    #[must_use]
    pub fn credential(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.credential = (!value.is_empty()).then(|| Credential::new(value));
        self
    }

    /// Use a caller-supplied transport instead of building one from
    /// [`TransportKind`].
    #[must_use]
    pub fn transport_impl(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// # Errors
    /// Returns an error if the selected transport rejects the configuration
    /// (TLS setup, invalid User-Agent or credential header name)
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => match self.config.transport {
                TransportKind::Async => Arc::new(HyperTransport::new(&self.config)?),
                TransportKind::Blocking => Arc::new(BlockingTransport::new(&self.config)?),
            },
        };

        tracing::debug!(
            base_url = %self.config.base_url,
            transport = self.config.transport.as_str(),
            "api client built"
        );

        Ok(ApiClient {
            state: Arc::new(ClientState {
                registry: RwLock::new(EndpointRegistry::new()),
                root: Node::root(),
                base_url: RwLock::new(self.config.base_url),
                credential: RwLock::new(self.credential),
                transport,
            }),
        })
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
