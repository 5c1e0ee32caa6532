//! Error types for document storage

use std::path::PathBuf;
use tagtree_engine::MutationError;
use tagtree_model::{ModelError, TreeId};
use tagtree_sync::TransportError;

/// Main storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with this id
    #[error("tree not found: {0}")]
    NotFound(TreeId),

    /// Insert of an id that is already stored
    #[error("tree already exists: {0}")]
    AlreadyExists(TreeId),

    /// Tree id cannot be used as a document key
    #[error("invalid tree id: {0:?}")]
    InvalidId(String),

    /// Document fails structural validation
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Edit cannot be applied to the stored document
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// Generated document would exceed the node limit
    #[error("generated tree would hold {nodes} nodes, limit is {limit}")]
    TooLarge {
        /// Requested node count (saturated)
        nodes: usize,
        /// Allowed node count
        limit: usize,
    },

    /// Document could not be encoded
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create I/O error with path context
    #[inline]
    #[must_use]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if retrying may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<StoreError> for TransportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(tree) => Self::NotFound(tree),
            StoreError::Io { .. } => Self::Unavailable(err.to_string()),
            other => Self::Rejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_transport_errors() {
        let tree = TreeId::from("t");
        assert_eq!(
            TransportError::from(StoreError::NotFound(tree.clone())),
            TransportError::NotFound(tree)
        );

        let io = StoreError::io_error("/x", std::io::Error::other("disk"));
        assert!(io.is_retryable());
        assert!(TransportError::from(io).is_retryable());

        let rejected = TransportError::from(StoreError::Mutation(MutationError::EmptyRemoval));
        assert!(matches!(rejected, TransportError::Rejected(_)));
    }
}
