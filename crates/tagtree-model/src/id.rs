//! Identifiers for nodes and tree documents
//!
//! Provides [`NodeId`] for addressing a node anywhere in a tree and
//! [`TreeId`] for addressing a whole stored document.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

/// Globally unique, immutable node identifier
///
/// Ids are opaque strings (the stored documents use UUIDs). Equality is
/// plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create new id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if id is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Stable identifier of one stored tree document
///
/// A document is addressed by the id of its root branch.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(String);

impl TreeId {
    /// Create new tree id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Node id of the document root
    #[inline]
    #[must_use]
    pub fn root_node(&self) -> NodeId {
        NodeId(self.0.clone())
    }
}

impl Display for TreeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TreeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TreeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&NodeId> for TreeId {
    fn from(id: &NodeId) -> Self {
        Self(id.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_id_display() {
        let id = NodeId::new("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn node_id_borrow_lookup() {
        let mut ids = HashSet::new();
        ids.insert(NodeId::from("a"));
        assert!(ids.contains("a"));
        assert!(!ids.contains("b"));
    }

    #[test]
    fn tree_id_root_node() {
        let tree = TreeId::from("root-1");
        assert_eq!(tree.root_node(), NodeId::from("root-1"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&NodeId::from("n1")).unwrap();
        assert_eq!(json, "\"n1\"");
        let back: TreeId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(back, TreeId::from("t1"));
    }
}
