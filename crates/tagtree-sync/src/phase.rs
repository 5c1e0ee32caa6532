//! Mutation lifecycle
//!
//! `Idle -> Pending -> {Committed | RolledBack} -> Idle`

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tagtree_model::TreeId;

/// Identifier of one mutation invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MutationId(u64);

impl MutationId {
    /// Wrap a raw sequence number
    #[inline]
    #[must_use]
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Raw sequence number
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for MutationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Phase of one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationPhase {
    /// Not started, or settled and reconciled
    Idle,
    /// Optimistic value in the cache, remote call in flight
    Pending,
    /// Remote store accepted the change
    Committed,
    /// Remote store failed, optimistic value undone
    RolledBack,
}

impl MutationPhase {
    /// Check if the remote call has resolved
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Committed | Self::RolledBack)
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: MutationPhase) -> Vec<MutationPhase> {
    use MutationPhase::{Committed, Idle, Pending, RolledBack};
    match from {
        Idle => vec![Pending],
        Pending => vec![Committed, RolledBack],
        Committed | RolledBack => vec![Idle],
    }
}

/// Validate a phase transition
///
/// # Errors
/// - `SyncError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: MutationPhase, to: MutationPhase) -> Result<(), SyncError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(SyncError::IllegalTransition { from, to })
    }
}

/// Snapshot of one tracked mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Mutation id
    pub id: MutationId,
    /// Tree the mutation targets
    pub tree: TreeId,
    /// Operation name (`delete_one`, `delete_many`, `update_leaf`)
    pub kind: &'static str,
    /// Current phase
    pub phase: MutationPhase,
}

impl MutationRecord {
    /// New record in `Idle`
    #[inline]
    #[must_use]
    pub fn new(id: MutationId, tree: TreeId, kind: &'static str) -> Self {
        Self {
            id,
            tree,
            kind,
            phase: MutationPhase::Idle,
        }
    }

    /// Move to `to` if the transition is legal
    ///
    /// # Errors
    /// - `SyncError::IllegalTransition` on an illegal move; the phase is unchanged
    pub fn advance(&mut self, to: MutationPhase) -> Result<(), SyncError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        Ok(())
    }
}
