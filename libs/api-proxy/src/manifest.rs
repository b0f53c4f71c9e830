use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Server-provided endpoint map: raw path to ordered argument names.
///
/// Wire form is a plain JSON object:
///
/// ```json
/// { "user.login": ["email", "password"], "system/ping": [] }
/// ```
///
/// Keys are normalized when the manifest is loaded into a client, so either
/// spelling works.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointManifest {
    endpoints: BTreeMap<String, Vec<String>>,
}

impl EndpointManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a manifest from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Manifest`] if the document is not an object of
    /// string arrays.
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json).map_err(ApiError::Manifest)
    }

    pub fn insert<I, S>(&mut self, path: impl Into<String>, arg_names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints
            .insert(path.into(), arg_names.into_iter().map(Into::into).collect());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.endpoints
            .iter()
            .map(|(path, names)| (path.as_str(), names.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
