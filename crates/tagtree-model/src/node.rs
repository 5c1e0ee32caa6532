//! Node shapes
//!
//! A tree is a single rooted [`Branch`]. Every node is either a [`Branch`]
//! (ordered children, optional display color, optional derived leaf count)
//! or a [`Leaf`] (user-entered fields, no children).
//!
//! # Wire format
//!
//! ```json
//! {
//!   "id": "root", "name": "Tags", "type": "tree", "color": "#aa00ff",
//!   "children": [
//!     { "id": "l1", "name": "cat", "type": "leaf",
//!       "isTraining": true, "secondaryInformation": "animal" }
//!   ]
//! }
//! ```

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// A node in a tag tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Node that can have children
    #[serde(rename = "tree")]
    Branch(Branch),
    /// Terminal node
    #[serde(rename = "leaf")]
    Leaf(Leaf),
}

impl Node {
    /// Node id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Branch(b) => &b.id,
            Self::Leaf(l) => &l.id,
        }
    }

    /// Node name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Branch(b) => &b.name,
            Self::Leaf(l) => &l.name,
        }
    }

    /// Children (empty for leaves)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Branch(b) => &b.children,
            Self::Leaf(_) => &[],
        }
    }

    /// Branch view, if this is a branch
    #[inline]
    #[must_use]
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(b) => Some(b),
            Self::Leaf(_) => None,
        }
    }

    /// Leaf view, if this is a leaf
    #[inline]
    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(l) => Some(l),
            Self::Branch(_) => None,
        }
    }

    /// Check if node is a leaf
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

impl From<Branch> for Node {
    fn from(b: Branch) -> Self {
        Self::Branch(b)
    }
}

impl From<Leaf> for Node {
    fn from(l: Leaf) -> Self {
        Self::Leaf(l)
    }
}

/// Node with ordered children
///
/// The root of every tree is a `Branch`; its id doubles as the document id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Unique id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Display hint, opaque to tree logic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ordered children
    #[serde(default)]
    pub children: Vec<Node>,
    /// Derived leaf count; recomputed after every structural change, never authoritative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl Branch {
    /// Create empty branch
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            children: Vec::new(),
            count: None,
        }
    }

    /// With color
    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// With children
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Append a child
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Pre-order iterator over every node below this branch
    ///
    /// The branch itself is not yielded (it is not a [`Node`] value).
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Find a node by id (the branch itself excluded)
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.descendants().find(|n| n.id().as_str() == id)
    }

    /// Check if the id is this branch or any of its descendants
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.id.as_str() == id || self.find(id).is_some()
    }

    /// Total number of nodes, root included
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.descendants().count()
    }
}

/// Pre-order traversal over a branch's descendants
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// Terminal node carrying user-entered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    /// Unique id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Whether the tag is used for model training
    #[serde(default)]
    pub is_training: bool,
    /// Free-form secondary text
    #[serde(default)]
    pub secondary_information: String,
}

impl Leaf {
    /// Create leaf with empty fields
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_training: false,
            secondary_information: String::new(),
        }
    }

    /// With training flag
    #[inline]
    #[must_use]
    pub fn training(mut self, is_training: bool) -> Self {
        self.is_training = is_training;
        self
    }

    /// With secondary information
    #[inline]
    #[must_use]
    pub fn with_secondary(mut self, info: impl Into<String>) -> Self {
        self.secondary_information = info.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Branch {
        Branch::new("root", "root").with_child(
            Branch::new("a", "A")
                .with_child(Leaf::new("b", "B"))
                .with_child(
                    Branch::new("c", "C")
                        .with_child(Leaf::new("d", "D"))
                        .with_child(Leaf::new("e", "E")),
                ),
        )
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = sample();
        let ids: Vec<&str> = tree.descendants().map(|n| n.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn find_and_contains() {
        let tree = sample();
        assert!(tree.find("d").is_some_and(Node::is_leaf));
        assert!(tree.find("root").is_none());
        assert!(tree.contains("root"));
        assert!(!tree.contains("zzz"));
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn json_shape_matches_documents() {
        let json = r##"{
            "id": "root", "name": "Tags", "type": "tree", "color": "#fff",
            "children": [
                { "id": "l1", "name": "cat", "type": "leaf",
                  "isTraining": true, "secondaryInformation": "animal" },
                { "id": "b1", "name": "empty", "type": "tree", "children": [] }
            ]
        }"##;

        let node: Node = serde_json::from_str(json).unwrap();
        let Node::Branch(root) = node else {
            panic!("root should be a branch");
        };
        assert_eq!(root.color.as_deref(), Some("#fff"));
        assert_eq!(root.children.len(), 2);
        let leaf = root.children[0].as_leaf().unwrap();
        assert!(leaf.is_training);
        assert_eq!(leaf.secondary_information, "animal");
        assert!(root.children[1].as_branch().unwrap().children.is_empty());
    }

    #[test]
    fn absent_count_is_not_serialized() {
        let json = serde_json::to_value(Node::from(Branch::new("x", "X"))).unwrap();
        assert_eq!(json["type"], "tree");
        assert!(json.get("count").is_none());
        assert!(json.get("color").is_none());
    }
}
