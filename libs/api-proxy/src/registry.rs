//! Endpoint registry: canonical path to argument names plus opaque config.

use std::collections::HashMap;
use std::sync::Arc;

use crate::path::EndpointPath;
use crate::transport::Params;

/// Metadata for one registered endpoint.
///
/// `arg_names` drives positional-argument translation; `extra` carries
/// whatever additional configuration the manifest supplied, untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointConfig {
    arg_names: Vec<String>,
    extra: Params,
}

impl EndpointConfig {
    #[must_use]
    pub fn new<I, S>(arg_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arg_names: arg_names.into_iter().map(Into::into).collect(),
            extra: Params::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Params) -> Self {
        self.extra = extra;
        self
    }

    /// Ordered parameter names for positional calls (may be empty).
    #[must_use]
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    #[must_use]
    pub fn extra(&self) -> &Params {
        &self.extra
    }
}

/// Path-keyed endpoint metadata. Last registration for a path wins.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    entries: HashMap<EndpointPath, Arc<EndpointConfig>>,
}

impl EndpointRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `config` under `path`, returning the entry it replaced.
    pub fn register(
        &mut self,
        path: EndpointPath,
        config: EndpointConfig,
    ) -> Option<Arc<EndpointConfig>> {
        self.entries.insert(path, Arc::new(config))
    }

    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Arc<EndpointConfig>> {
        self.entries.get(path).cloned()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Registered paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<EndpointPath> {
        let mut paths: Vec<EndpointPath> = self.entries.keys().cloned().collect();
        paths.sort();
        paths
    }
}
