//! Structural validation
//!
//! Trees handed to the engine must have unique, non-empty ids. Cycles and
//! shared children cannot be built with owned children, so ids are the only
//! thing left to check.

use crate::id::NodeId;
use crate::node::Branch;
use std::collections::HashSet;

/// Structural model errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Same id used by more than one node
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    /// Node without an id
    #[error("empty node id under parent {parent}")]
    EmptyId {
        /// Id of the branch holding the offending child
        parent: NodeId,
    },

    /// Document could not be decoded
    #[error("malformed tree document: {0}")]
    Malformed(String),
}

/// Check that every id in the tree is non-empty and unique
///
/// # Errors
/// Returns the first violation found in pre-order.
pub fn validate_tree(root: &Branch) -> Result<(), ModelError> {
    if root.id.is_empty() {
        return Err(ModelError::EmptyId {
            parent: NodeId::new(""),
        });
    }

    let mut seen: HashSet<&NodeId> = HashSet::new();
    seen.insert(&root.id);
    check_children(root, &mut seen)
}

fn check_children<'a>(branch: &'a Branch, seen: &mut HashSet<&'a NodeId>) -> Result<(), ModelError> {
    for child in &branch.children {
        let id = child.id();
        if id.is_empty() {
            return Err(ModelError::EmptyId {
                parent: branch.id.clone(),
            });
        }
        if !seen.insert(id) {
            return Err(ModelError::DuplicateId(id.clone()));
        }
        if let Some(sub) = child.as_branch() {
            check_children(sub, seen)?;
        }
    }
    Ok(())
}

/// Decode and validate a tree document from JSON
///
/// # Errors
/// - `ModelError::Malformed` if the JSON is not a branch document
/// - any structural error from [`validate_tree`]
pub fn parse_tree(json: &str) -> Result<Branch, ModelError> {
    let node: crate::node::Node =
        serde_json::from_str(json).map_err(|e| ModelError::Malformed(e.to_string()))?;
    let crate::node::Node::Branch(root) = node else {
        return Err(ModelError::Malformed("root must be a branch".to_string()));
    };
    validate_tree(&root)?;
    Ok(root)
}
