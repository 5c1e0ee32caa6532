//! Server-side tree handlers
//!
//! Each edit loads the addressed document, applies one [`TreeMutation`]
//! and replaces the whole document. Edits to the same document are
//! serialized inside one service; across processes the last writer wins.
//!
//! [`TreeService`] also implements [`TreeTransport`], so a coordinator can
//! talk to it in-process without any wire layer.

use crate::document::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tagtree_engine::{strip_counts, TreeMutation};
use tagtree_model::{validate_tree, Branch, LeafPatch, NodeId, TreeId};
use tagtree_sync::{TransportError, TreeTransport};
use tokio::sync::Mutex;

/// Handlers over a document store
#[derive(Debug)]
pub struct TreeService<S: ?Sized> {
    store: Arc<S>,
    locks: DashMap<TreeId, Arc<Mutex<()>>>,
}

impl<S: DocumentStore + ?Sized> TreeService<S> {
    /// Create service over `store`
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Load one document
    ///
    /// # Errors
    /// - `StoreError::NotFound` if no document has this id
    pub async fn get(&self, tree: &TreeId) -> Result<Branch, StoreError> {
        self.store
            .find_one(tree)
            .await?
            .ok_or_else(|| StoreError::NotFound(tree.clone()))
    }

    /// Ids of all stored documents
    ///
    /// # Errors
    /// Backend failures.
    pub async fn list(&self) -> Result<Vec<TreeId>, StoreError> {
        self.store.list().await
    }

    /// Apply one edit and replace the stored document
    ///
    /// Returns the stored result (without counts).
    ///
    /// # Errors
    /// - `StoreError::NotFound` if no document has this id
    /// - `StoreError::Mutation` if the edit is invalid (e.g. removes the root)
    pub async fn apply(&self, tree: &TreeId, mutation: &TreeMutation) -> Result<Branch, StoreError> {
        let lock = self.lock_for(tree);
        let _guard = lock.lock().await;

        let current = self.get(tree).await?;
        let edited = strip_counts(&mutation.apply(&current)?);
        self.store.replace_one(tree, &edited).await?;

        tracing::info!("Applied {} to {} via {}", mutation, tree, self.store.name());
        Ok(edited)
    }

    /// Remove nodes and their subtrees
    ///
    /// # Errors
    /// See [`Self::apply`].
    pub async fn delete(&self, tree: &TreeId, ids: &BTreeSet<NodeId>) -> Result<Branch, StoreError> {
        self.apply(tree, &TreeMutation::DeleteNodes { ids: ids.clone() }).await
    }

    /// Merge fields into a leaf
    ///
    /// # Errors
    /// See [`Self::apply`].
    pub async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: &NodeId,
        patch: &LeafPatch,
    ) -> Result<Branch, StoreError> {
        self.apply(tree, &TreeMutation::update_leaf(leaf.clone(), patch.clone()))
            .await
    }

    /// Store a document under its root id, replacing any previous version
    ///
    /// # Errors
    /// - `StoreError::Model` if the document is structurally invalid
    pub async fn seed(&self, doc: &Branch) -> Result<TreeId, StoreError> {
        validate_tree(doc)?;
        let doc = strip_counts(doc);
        let tree = TreeId::from(&doc.id);

        let lock = self.lock_for(&tree);
        let _guard = lock.lock().await;

        if self.store.find_one(&tree).await?.is_some() {
            self.store.replace_one(&tree, &doc).await?;
            tracing::info!("Replaced tree {} ({} nodes)", tree, doc.node_count());
        } else {
            self.store.insert(&doc).await?;
            tracing::info!("Inserted tree {} ({} nodes)", tree, doc.node_count());
        }
        Ok(tree)
    }

    fn lock_for(&self, tree: &TreeId) -> Arc<Mutex<()>> {
        self.locks.entry(tree.clone()).or_default().value().clone()
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> TreeTransport for TreeService<S> {
    async fn fetch_tree(&self, tree: &TreeId) -> Result<Branch, TransportError> {
        Ok(self.get(tree).await?)
    }

    async fn delete_nodes(
        &self,
        tree: &TreeId,
        ids: &BTreeSet<NodeId>,
    ) -> Result<(), TransportError> {
        self.delete(tree, ids).await?;
        Ok(())
    }

    async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: &NodeId,
        patch: &LeafPatch,
    ) -> Result<(), TransportError> {
        TreeService::update_leaf(self, tree, leaf, patch).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use pretty_assertions::assert_eq;
    use tagtree_engine::{annotate_with_counts, MutationError};
    use tagtree_test_utils::{ids, sample_tree};

    async fn seeded() -> TreeService<MemoryStore> {
        let service = TreeService::new(Arc::new(MemoryStore::new()));
        service.seed(&sample_tree()).await.unwrap();
        service
    }

    fn root() -> TreeId {
        TreeId::from("root")
    }

    #[tokio::test]
    async fn delete_replaces_whole_document() {
        let service = seeded().await;
        let stored = service.delete(&root(), &ids(&["c"])).await.unwrap();

        assert!(!stored.contains("c"));
        assert!(!stored.contains("d"));
        assert_eq!(service.get(&root()).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn update_leaf_merges_fields() {
        let service = seeded().await;
        let patch = LeafPatch::new().secondary_information("checked by QA");
        service
            .update_leaf(&root(), &NodeId::from("b"), &patch)
            .await
            .unwrap();

        let stored = service.get(&root()).await.unwrap();
        let leaf = stored.find("b").and_then(|n| n.as_leaf()).unwrap();
        assert_eq!(leaf.secondary_information, "checked by QA");
        assert_eq!(leaf.name, "B");
    }

    #[tokio::test]
    async fn root_delete_is_rejected_and_document_kept() {
        let service = seeded().await;
        let err = service.delete(&root(), &ids(&["root"])).await.unwrap_err();
        assert!(matches!(err, StoreError::Mutation(MutationError::RootRemoval(_))));
        assert_eq!(service.get(&root()).await.unwrap(), sample_tree());
    }

    #[tokio::test]
    async fn seed_strips_counts_and_replaces() {
        let service = seeded().await;
        let id = service.seed(&annotate_with_counts(&sample_tree())).await.unwrap();
        assert_eq!(id, root());
        assert_eq!(service.get(&root()).await.unwrap().count, None);
        assert_eq!(service.list().await.unwrap(), vec![root()]);
    }

    #[tokio::test]
    async fn seed_rejects_duplicate_ids() {
        let service = TreeService::new(Arc::new(MemoryStore::new()));
        let bad = Branch::new("t", "t")
            .with_child(Branch::new("x", "x"))
            .with_child(Branch::new("x", "again"));
        assert!(matches!(service.seed(&bad).await, Err(StoreError::Model(_))));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn transport_maps_missing_tree() {
        let service = seeded().await;
        let err = service.fetch_tree(&TreeId::from("other")).await.unwrap_err();
        assert_eq!(err, TransportError::NotFound(TreeId::from("other")));
    }

    #[tokio::test]
    async fn concurrent_edits_are_not_lost() {
        let service = Arc::new(seeded().await);
        let handles: Vec<_> = ["b", "d", "e"]
            .into_iter()
            .map(|id| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.delete(&root(), &ids(&[id])).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = service.get(&root()).await.unwrap();
        let left: Vec<&str> = stored.descendants().map(|n| n.id().as_str()).collect();
        assert_eq!(left, ["a", "c"]);
    }
}
