//! Error types for structural mutations

use tagtree_model::NodeId;

/// Errors raised by structural mutations
///
/// Missing targets are not errors: removing an unknown id filters nothing
/// and patching an unknown leaf leaves the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// Attempt to remove the addressed root document
    #[error("cannot remove tree root: {0}")]
    RootRemoval(NodeId),

    /// Delete request without any target ids
    #[error("no node ids given for removal")]
    EmptyRemoval,
}
