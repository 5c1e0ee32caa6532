//! Remote store seam
//!
//! The coordinator only needs "send mutation, await success/failure" plus a
//! whole-document fetch. HTTP, GraphQL or an in-process service all fit
//! behind [`TreeTransport`].

use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tagtree_model::{Branch, LeafPatch, NodeId, TreeId};

/// Access to the authoritative tree documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreeTransport: Send + Sync {
    /// Fetch the whole tree document
    ///
    /// # Errors
    /// - `TransportError::NotFound` if no document has this id
    async fn fetch_tree(&self, tree: &TreeId) -> Result<Branch, TransportError>;

    /// Remove nodes (and their subtrees) from the stored document
    async fn delete_nodes(&self, tree: &TreeId, ids: &BTreeSet<NodeId>)
        -> Result<(), TransportError>;

    /// Merge fields into a stored leaf
    async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: &NodeId,
        patch: &LeafPatch,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: TreeTransport + ?Sized> TreeTransport for Arc<T> {
    async fn fetch_tree(&self, tree: &TreeId) -> Result<Branch, TransportError> {
        (**self).fetch_tree(tree).await
    }

    async fn delete_nodes(
        &self,
        tree: &TreeId,
        ids: &BTreeSet<NodeId>,
    ) -> Result<(), TransportError> {
        (**self).delete_nodes(tree, ids).await
    }

    async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: &NodeId,
        patch: &LeafPatch,
    ) -> Result<(), TransportError> {
        (**self).update_leaf(tree, leaf, patch).await
    }
}
