use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::client::ClientState;
use crate::deferred::Deferred;
use crate::dispatch::Call;
use crate::graph::Node;
use crate::path::EndpointPath;

/// Handle to one node of a client's call graph.
///
/// Every namespace is invocable: calling it posts to its own canonical path,
/// so `api.get("user")` and its child `login` can both be called. Handles are
/// cheap to clone and stay valid as more endpoints are declared.
#[derive(Clone)]
pub struct Namespace {
    state: Arc<ClientState>,
    node: Arc<Node>,
}

impl Namespace {
    pub(crate) fn new(state: Arc<ClientState>, node: Arc<Node>) -> Self {
        Self { state, node }
    }

    /// Canonical path this namespace posts to (empty for the root).
    #[must_use]
    pub fn path(&self) -> &EndpointPath {
        self.node.path()
    }

    /// Direct child by segment name.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<Namespace> {
        self.node.child(segment).map(|node| self.with_node(node))
    }

    /// Descendant by relative path, in either spelling (`a.b` or `a/b`).
    #[must_use]
    pub fn at(&self, relative: &str) -> Option<Namespace> {
        self.node
            .find(&EndpointPath::normalize(relative))
            .map(|node| self.with_node(node))
    }

    /// Child segment names, sorted.
    #[must_use]
    pub fn children(&self) -> Vec<String> {
        self.node.child_names()
    }

    /// True if this exact path was declared, rather than only created as a
    /// prefix of a deeper declaration.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.state.is_registered(self.node.path())
    }

    /// True if both handles refer to the same graph node.
    #[must_use]
    pub fn same_node(&self, other: &Namespace) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Invoke the endpoint bound to this namespace.
    ///
    /// Sending needs a tokio runtime; see [`Deferred`].
    pub fn call(&self, call: impl Into<Call>) -> Deferred {
        self.state.dispatch(self.path().clone(), call.into(), None)
    }

    /// [`call`](Self::call) that also hands the fulfilled value to
    /// `callback` before the deferred result resolves. Rejections skip the
    /// callback and are still returned by the deferred result. A panicking
    /// callback is logged and does not turn the call into a rejection.
    pub fn call_with<F>(&self, call: impl Into<Call>, callback: F) -> Deferred
    where
        F: FnOnce(&Value) + Send + 'static,
    {
        self.state
            .dispatch(self.path().clone(), call.into(), Some(Box::new(callback)))
    }

    fn with_node(&self, node: Arc<Node>) -> Namespace {
        Namespace {
            state: Arc::clone(&self.state),
            node,
        }
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("path", &self.path().as_str())
            .field("children", &self.children())
            .finish_non_exhaustive()
    }
}
