//! JSON file document store
//!
//! One `<tree-id>.json` file per document under a directory. Files hold the
//! stored wire shape (`"type": "tree"` root, camelCase leaf fields), so they
//! can be exchanged with any other consumer of the documents.
//!
//! # Atomic Writes
//!
//! 1. Write to `<tree-id>.json.tmp`
//! 2. Flush and sync
//! 3. Rename over `<tree-id>.json`

use crate::document::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tagtree_model::{parse_tree, Branch, Node, TreeId};
use tokio::io::AsyncWriteExt;

const EXTENSION: &str = "json";

/// Documents stored as JSON files in one directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create store rooted at `dir`
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the documents
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn doc_path(&self, tree: &TreeId) -> Result<PathBuf, StoreError> {
        let raw = tree.as_str();
        let unsafe_id = raw.is_empty()
            || raw.starts_with('.')
            || raw.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        if unsafe_id {
            return Err(StoreError::InvalidId(raw.to_string()));
        }
        Ok(self.dir.join(format!("{raw}.{EXTENSION}")))
    }

    async fn read(&self, path: &Path) -> Result<Option<Branch>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(parse_tree(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }

    async fn write(&self, path: &Path, doc: &Branch) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io_error(&self.dir, e))?;

        let body = serde_json::to_vec_pretty(&Node::Branch(doc.clone()))?;
        let mut tmp = path.to_path_buf();
        tmp.set_extension("json.tmp");
        {
            let mut file = tokio::fs::File::create(&tmp)
                .await
                .map_err(|e| StoreError::io_error(&tmp, e))?;
            file.write_all(&body)
                .await
                .map_err(|e| StoreError::io_error(&tmp, e))?;
            file.sync_all()
                .await
                .map_err(|e| StoreError::io_error(&tmp, e))?;
        }
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io_error(path, e))?;

        tracing::debug!(path = %path.display(), bytes = body.len(), "wrote tree document");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn name(&self) -> &'static str {
        "json-file"
    }

    async fn find_one(&self, tree: &TreeId) -> Result<Option<Branch>, StoreError> {
        let path = self.doc_path(tree)?;
        self.read(&path).await
    }

    async fn replace_one(&self, tree: &TreeId, doc: &Branch) -> Result<(), StoreError> {
        let path = self.doc_path(tree)?;
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?
        {
            return Err(StoreError::NotFound(tree.clone()));
        }
        self.write(&path, doc).await
    }

    async fn insert(&self, doc: &Branch) -> Result<TreeId, StoreError> {
        let tree = TreeId::from(&doc.id);
        let path = self.doc_path(&tree)?;
        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io_error(&path, e))?
        {
            return Err(StoreError::AlreadyExists(tree));
        }
        self.write(&path, doc).await?;
        Ok(tree)
    }

    async fn list(&self) -> Result<Vec<TreeId>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io_error(&self.dir, e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io_error(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(TreeId::from(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}
