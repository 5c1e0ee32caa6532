//! Per-view selection context
//!
//! A [`SelectionSession`] is owned by whoever renders one tree. It pairs the
//! tree currently shown with the selection computed against it and is passed
//! explicitly; there is no process-wide selection state.

use crate::map::SelectionMap;
use crate::propagate::{checked_branch_roots, set_node_status};
use crate::status::{SelectionStatus, TargetStatus};
use std::sync::Arc;
use tagtree_model::{Branch, NodeId};

/// Selection state for one rendered tree
#[derive(Debug, Clone)]
pub struct SelectionSession {
    tree: Arc<Branch>,
    selection: SelectionMap,
}

impl SelectionSession {
    /// Start a session with an empty selection
    #[inline]
    #[must_use]
    pub fn new(tree: Arc<Branch>) -> Self {
        Self {
            tree,
            selection: SelectionMap::new(),
        }
    }

    /// Tree the selection is computed against
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &Arc<Branch> {
        &self.tree
    }

    /// Current selection snapshot
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    /// Status of one node
    #[inline]
    #[must_use]
    pub fn status(&self, id: &str) -> SelectionStatus {
        self.selection.status(id)
    }

    /// Toggle a node and replace the selection with the recomputed map
    pub fn toggle(&mut self, id: &str, requested: TargetStatus) -> &SelectionMap {
        self.selection = set_node_status(&self.tree, &self.selection, id, requested);
        tracing::debug!(node = id, ?requested, entries = self.selection.len(), "selection updated");
        &self.selection
    }

    /// Ids a bulk delete of the current selection would send
    #[must_use]
    pub fn checked_roots(&self) -> Vec<NodeId> {
        checked_branch_roots(&self.tree, &self.selection)
    }

    /// Point the session at a new tree value
    ///
    /// The selection survives edits of the same tree (entries for removed
    /// ids stay inert) and is discarded when a different tree is loaded.
    /// Returns `true` if the selection was reset.
    pub fn rebind(&mut self, tree: Arc<Branch>) -> bool {
        let reset = tree.id != self.tree.id;
        if reset {
            tracing::debug!(from = %self.tree.id, to = %tree.id, "tree identity changed, clearing selection");
            self.selection = SelectionMap::new();
        }
        self.tree = tree;
        reset
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selection = SelectionMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagtree_test_utils::sample_tree;

    #[test]
    fn toggle_and_roots() {
        let mut session = SelectionSession::new(Arc::new(sample_tree()));
        session.toggle("c", TargetStatus::Checked);

        assert_eq!(session.status("d"), SelectionStatus::Checked);
        assert_eq!(session.checked_roots(), vec![NodeId::from("c")]);
    }

    #[test]
    fn rebind_same_tree_keeps_selection() {
        let tree = Arc::new(sample_tree());
        let mut session = SelectionSession::new(Arc::clone(&tree));
        session.toggle("d", TargetStatus::Checked);

        let edited = Arc::new(tagtree_model::Branch {
            children: Vec::new(),
            ..(*tree).clone()
        });
        assert!(!session.rebind(edited));
        assert_eq!(session.selection().get("d"), Some(SelectionStatus::Checked));
        assert!(session.checked_roots().is_empty());
    }

    #[test]
    fn rebind_other_tree_resets() {
        let mut session = SelectionSession::new(Arc::new(sample_tree()));
        session.toggle("d", TargetStatus::Checked);

        assert!(session.rebind(Arc::new(Branch::new("other", "other"))));
        assert!(session.selection().is_empty());
    }
}
