//! Document store seam
//!
//! One document per tree id, replaced whole on every edit. Implementations
//! must make each call atomic per document; nothing spans documents.

use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;
use tagtree_model::{Branch, TreeId};

/// Storage for whole tree documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Load a document, `None` if absent
    ///
    /// # Errors
    /// Backend failures only; absence is not an error.
    async fn find_one(&self, tree: &TreeId) -> Result<Option<Branch>, StoreError>;

    /// Replace an existing document
    ///
    /// # Errors
    /// - `StoreError::NotFound` if no document has this id
    async fn replace_one(&self, tree: &TreeId, doc: &Branch) -> Result<(), StoreError>;

    /// Store a new document under its root id
    ///
    /// # Errors
    /// - `StoreError::AlreadyExists` if the id is taken
    async fn insert(&self, doc: &Branch) -> Result<TreeId, StoreError>;

    /// Ids of all stored documents, sorted
    ///
    /// # Errors
    /// Backend failures.
    async fn list(&self) -> Result<Vec<TreeId>, StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn find_one(&self, tree: &TreeId) -> Result<Option<Branch>, StoreError> {
        (**self).find_one(tree).await
    }

    async fn replace_one(&self, tree: &TreeId, doc: &Branch) -> Result<(), StoreError> {
        (**self).replace_one(tree, doc).await
    }

    async fn insert(&self, doc: &Branch) -> Result<TreeId, StoreError> {
        (**self).insert(doc).await
    }

    async fn list(&self) -> Result<Vec<TreeId>, StoreError> {
        (**self).list().await
    }
}
