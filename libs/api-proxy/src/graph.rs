//! Callable namespace tree mirroring the registered endpoint paths.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::path::EndpointPath;

/// One node of the call graph.
///
/// Every node is bound to the canonical path from the root to itself, so an
/// intermediate namespace is also invocable (`api.user` posts to `user`).
/// Nodes are only ever added; an existing node is never replaced.
#[derive(Debug)]
pub struct Node {
    path: EndpointPath,
    children: RwLock<BTreeMap<String, Arc<Node>>>,
}

impl Node {
    /// Root node, bound to the empty path.
    #[must_use]
    pub fn root() -> Arc<Self> {
        Arc::new(Self::new(EndpointPath::default()))
    }

    fn new(path: EndpointPath) -> Self {
        Self {
            path,
            children: RwLock::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &EndpointPath {
        &self.path
    }

    #[must_use]
    pub fn child(&self, segment: &str) -> Option<Arc<Node>> {
        self.children.read().get(segment).cloned()
    }

    /// Child segment names, sorted.
    #[must_use]
    pub fn child_names(&self) -> Vec<String> {
        self.children.read().keys().cloned().collect()
    }

    /// Walk `path` from this node, creating any missing nodes, and return the
    /// node bound to the full path.
    ///
    /// Existing nodes along the way are reused, so registrations sharing a
    /// prefix share the same intermediate nodes.
    pub fn ensure_path(self: &Arc<Self>, path: &EndpointPath) -> Arc<Node> {
        let mut current = Arc::clone(self);
        let mut prefix: Vec<&str> = Vec::new();

        for segment in path.segments() {
            prefix.push(segment);
            let next = {
                let mut children = current.children.write();
                let node = children.entry(segment.to_owned()).or_insert_with(|| {
                    let bound = EndpointPath::from_segments(&prefix);
                    tracing::trace!(path = %bound, "creating namespace node");
                    Arc::new(Node::new(bound))
                });
                Arc::clone(node)
            };
            current = next;
        }

        current
    }

    /// Follow `path` without creating anything.
    #[must_use]
    pub fn find(self: &Arc<Self>, path: &EndpointPath) -> Option<Arc<Node>> {
        let mut current = Arc::clone(self);
        for segment in path.segments() {
            current = current.child(segment)?;
        }
        Some(current)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_nodes_bound_to_their_prefix() {
        let root = Node::root();
        let leaf = root.ensure_path(&EndpointPath::normalize("a/b/c"));
        assert_eq!(leaf.path().as_str(), "a/b/c");

        let a = root.child("a").unwrap();
        assert_eq!(a.path().as_str(), "a");
        let b = a.child("b").unwrap();
        assert_eq!(b.path().as_str(), "a/b");
        assert!(Arc::ptr_eq(&b.child("c").unwrap(), &leaf));
    }

    #[test]
    fn test_shared_prefix_reuses_nodes() {
        let root = Node::root();
        root.ensure_path(&EndpointPath::normalize("a/b/c"));
        let a_before = root.child("a").unwrap();
        let b_before = a_before.child("b").unwrap();

        root.ensure_path(&EndpointPath::normalize("a/b/d"));
        let a_after = root.child("a").unwrap();
        let b_after = a_after.child("b").unwrap();

        assert!(Arc::ptr_eq(&a_before, &a_after));
        assert!(Arc::ptr_eq(&b_before, &b_after));
        assert_eq!(b_after.child_names(), ["c", "d"]);
    }

    #[test]
    fn test_reregistering_keeps_existing_leaf() {
        let root = Node::root();
        let first = root.ensure_path(&EndpointPath::normalize("x/y"));
        let second = root.ensure_path(&EndpointPath::normalize("x.y"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_extending_a_leaf_keeps_it_callable_path() {
        let root = Node::root();
        let user = root.ensure_path(&EndpointPath::normalize("user"));
        let login = root.ensure_path(&EndpointPath::normalize("user/login"));
        assert_eq!(user.path().as_str(), "user");
        assert!(Arc::ptr_eq(&user.child("login").unwrap(), &login));
    }

    #[test]
    fn test_empty_path_is_root() {
        let root = Node::root();
        let node = root.ensure_path(&EndpointPath::normalize(""));
        assert!(Arc::ptr_eq(&root, &node));
        assert!(root.child_names().is_empty());
    }

    #[test]
    fn test_find_does_not_create() {
        let root = Node::root();
        root.ensure_path(&EndpointPath::normalize("a/b"));
        assert!(root.find(&EndpointPath::normalize("a/b")).is_some());
        assert!(root.find(&EndpointPath::normalize("a/z")).is_none());
        assert_eq!(root.child("a").unwrap().child_names(), ["b"]);
    }
}
