//! Mutation values
//!
//! [`TreeMutation`] packages the arguments of one structural edit so the
//! same edit can be projected locally and applied authoritatively by the
//! store with identical results.

use crate::count::annotate_with_counts;
use crate::error::MutationError;
use crate::mutation::{remove_nodes, update_leaf_fields};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use tagtree_model::{Branch, LeafPatch, NodeId};

/// One structural edit against a tree document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeMutation {
    /// Remove nodes and their subtrees
    DeleteNodes {
        /// Ids to remove
        ids: BTreeSet<NodeId>,
    },
    /// Merge fields into a leaf
    UpdateLeaf {
        /// Target leaf
        leaf: NodeId,
        /// Fields to merge
        patch: LeafPatch,
    },
}

impl TreeMutation {
    /// Delete a single node
    #[inline]
    #[must_use]
    pub fn delete_one(id: impl Into<NodeId>) -> Self {
        Self::DeleteNodes {
            ids: BTreeSet::from([id.into()]),
        }
    }

    /// Delete several nodes
    #[inline]
    #[must_use]
    pub fn delete_many<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        Self::DeleteNodes {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Patch a leaf
    #[inline]
    #[must_use]
    pub fn update_leaf(leaf: impl Into<NodeId>, patch: LeafPatch) -> Self {
        Self::UpdateLeaf {
            leaf: leaf.into(),
            patch,
        }
    }

    /// Short operation name for logs
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeleteNodes { ids } if ids.len() == 1 => "delete_one",
            Self::DeleteNodes { .. } => "delete_many",
            Self::UpdateLeaf { .. } => "update_leaf",
        }
    }

    /// Check arguments before any tree is touched
    ///
    /// # Errors
    /// - `MutationError::EmptyRemoval` for a delete without ids
    pub fn check(&self) -> Result<(), MutationError> {
        match self {
            Self::DeleteNodes { ids } if ids.is_empty() => Err(MutationError::EmptyRemoval),
            _ => Ok(()),
        }
    }

    /// Apply to `tree`, returning the edited tree with fresh counts
    ///
    /// # Errors
    /// - `MutationError::EmptyRemoval` for a delete without ids
    /// - `MutationError::RootRemoval` if a delete targets the root
    pub fn apply(&self, tree: &Branch) -> Result<Branch, MutationError> {
        self.check()?;
        let edited = match self {
            Self::DeleteNodes { ids } => remove_nodes(tree, ids)?,
            Self::UpdateLeaf { leaf, patch } => update_leaf_fields(tree, leaf, patch),
        };
        Ok(annotate_with_counts(&edited))
    }
}

impl Display for TreeMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteNodes { ids } => {
                let joined: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
                write!(f, "delete [{}]", joined.join(", "))
            }
            Self::UpdateLeaf { leaf, .. } => write!(f, "update leaf {leaf}"),
        }
    }
}
