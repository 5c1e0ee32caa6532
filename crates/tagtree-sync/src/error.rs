//! Error types for cache coordination
//!
//! Provides error handling for:
//! - Transport failures talking to the remote store
//! - Mutations rejected before they reach the network
//! - Rolled-back optimistic updates
//! - Illegal mutation phase transitions

use crate::phase::{MutationId, MutationPhase};
use tagtree_engine::MutationError;
use tagtree_model::{ModelError, TreeId};

/// Failures reported by a [`crate::TreeTransport`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Tree document does not exist
    #[error("tree not found: {0}")]
    NotFound(TreeId),

    /// Server refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Store or network unreachable
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// No answer within the configured timeout
    #[error("request timed out after {after_ms}ms")]
    Timeout {
        /// Elapsed budget in milliseconds
        after_ms: u64,
    },
}

impl TransportError {
    /// Check if retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout { .. })
    }
}

/// Main coordination error type
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Mutation requested before the tree was loaded into the cache
    #[error("tree not loaded: {0}")]
    NotLoaded(TreeId),

    /// Mutation arguments invalid for the cached tree
    #[error("invalid mutation: {0}")]
    InvalidMutation(#[from] MutationError),

    /// Remote store failed; the optimistic change was undone
    #[error("mutation {mutation} rolled back: {source}")]
    RolledBack {
        /// Mutation that failed
        mutation: MutationId,
        /// Transport failure that caused the rollback
        #[source]
        source: TransportError,
        /// Whether the authoritative refetch after settling succeeded
        reconciled: bool,
    },

    /// Fetching the authoritative tree failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] TransportError),

    /// Remote store returned a structurally invalid tree
    #[error("malformed tree from remote store: {0}")]
    Malformed(#[from] ModelError),

    /// Phase machine violation
    #[error("illegal phase transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current phase
        from: MutationPhase,
        /// Requested phase
        to: MutationPhase,
    },
}

impl SyncError {
    /// Check if the user can simply try again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RolledBack { source, .. } | Self::Fetch(source) => source.is_retryable(),
            _ => false,
        }
    }

    /// Check if an optimistic update was undone
    #[inline]
    #[must_use]
    pub fn is_rollback(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}
