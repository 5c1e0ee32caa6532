//! In-process document store

use crate::document::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tagtree_model::{Branch, TreeId};

/// Documents held in a locked map
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<TreeId, Branch>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Check if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_one(&self, tree: &TreeId) -> Result<Option<Branch>, StoreError> {
        Ok(self.docs.read().get(tree).cloned())
    }

    async fn replace_one(&self, tree: &TreeId, doc: &Branch) -> Result<(), StoreError> {
        let mut docs = self.docs.write();
        let slot = docs
            .get_mut(tree)
            .ok_or_else(|| StoreError::NotFound(tree.clone()))?;
        *slot = doc.clone();
        Ok(())
    }

    async fn insert(&self, doc: &Branch) -> Result<TreeId, StoreError> {
        let tree = TreeId::from(&doc.id);
        let mut docs = self.docs.write();
        if docs.contains_key(&tree) {
            return Err(StoreError::AlreadyExists(tree));
        }
        docs.insert(tree.clone(), doc.clone());
        Ok(tree)
    }

    async fn list(&self) -> Result<Vec<TreeId>, StoreError> {
        let mut ids: Vec<TreeId> = self.docs.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
