//! Selection propagation
//!
//! [`set_node_status`] is called on every checkbox click. It walks the whole
//! tree once: the matched node and its subtree take the requested status,
//! and every other branch is re-derived from its children on the way back
//! up. The walk does not stop at the match, so siblings of the target path
//! are re-derived too (which leaves consistent entries unchanged).

use crate::map::SelectionMap;
use crate::status::{SelectionStatus, TargetStatus};
use tagtree_model::{Branch, Node, NodeId};

/// Compute the selection after setting `target` to `requested`
///
/// Pure: `prior` is not modified and equal inputs give equal outputs.
/// An unknown `target` only re-derives branch statuses.
#[must_use]
pub fn set_node_status(
    tree: &Branch,
    prior: &SelectionMap,
    target: &str,
    requested: TargetStatus,
) -> SelectionMap {
    let mut pass = Propagation {
        target,
        status: requested.into(),
        selection: prior.clone(),
    };
    pass.visit_branch(tree);
    pass.selection
}

struct Propagation<'a> {
    target: &'a str,
    status: SelectionStatus,
    selection: SelectionMap,
}

impl Propagation<'_> {
    fn visit(&mut self, node: &Node) {
        match node {
            Node::Branch(branch) => self.visit_branch(branch),
            Node::Leaf(leaf) => {
                if leaf.id.as_str() == self.target {
                    self.selection.set(&leaf.id, self.status);
                }
            }
        }
    }

    fn visit_branch(&mut self, branch: &Branch) {
        if branch.id.as_str() == self.target {
            self.cascade(&branch.id, &branch.children);
            return;
        }

        for child in &branch.children {
            self.visit(child);
        }

        let derived = SelectionStatus::derive(
            branch
                .children
                .iter()
                .map(|child| self.selection.status(child.id().as_str())),
        );
        if let Some(status) = derived {
            self.selection.set(&branch.id, status);
        }
    }

    /// Explicit status on a node overrides anything below it
    fn cascade(&mut self, id: &NodeId, children: &[Node]) {
        self.selection.set(id, self.status);
        for child in children {
            self.cascade(child.id(), child.children());
        }
    }
}

/// Highest checked nodes, in pre-order
///
/// A checked node is reported once and its subtree is not searched, so the
/// result is the minimal id set a bulk delete needs.
#[must_use]
pub fn checked_branch_roots(tree: &Branch, selection: &SelectionMap) -> Vec<NodeId> {
    let mut roots = Vec::new();
    if selection.status(tree.id.as_str()).is_checked() {
        roots.push(tree.id.clone());
        return roots;
    }
    for child in &tree.children {
        collect_checked(child, selection, &mut roots);
    }
    roots
}

fn collect_checked(node: &Node, selection: &SelectionMap, roots: &mut Vec<NodeId>) {
    if selection.status(node.id().as_str()).is_checked() {
        roots.push(node.id().clone());
        return;
    }
    for child in node.children() {
        collect_checked(child, selection, roots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagtree_model::Leaf;
    use tagtree_test_utils::sample_tree;
    use SelectionStatus::{Checked, Indeterminate, Unchecked};

    #[test]
    fn checking_leaf_marks_ancestors_indeterminate() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "d", TargetStatus::Checked);

        assert_eq!(sel.status("d"), Checked);
        assert_eq!(sel.status("c"), Indeterminate);
        assert_eq!(sel.status("a"), Indeterminate);
        assert_eq!(sel.status("root"), Indeterminate);
        assert_eq!(sel.get("b"), None);
        assert_eq!(sel.get("e"), None);
    }

    #[test]
    fn checking_all_children_checks_parent() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "d", TargetStatus::Checked);
        let sel = set_node_status(&tree, &sel, "e", TargetStatus::Checked);

        assert_eq!(sel.status("d"), Checked);
        assert_eq!(sel.status("e"), Checked);
        assert_eq!(sel.status("c"), Checked);
        assert_eq!(sel.status("a"), Indeterminate);
        assert_eq!(sel.status("b"), Unchecked);
    }

    #[test]
    fn checking_branch_cascades() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "a", TargetStatus::Checked);

        for id in ["a", "b", "c", "d", "e", "root"] {
            assert_eq!(sel.status(id), Checked, "{id}");
        }
    }

    #[test]
    fn unchecking_branch_overrides_mixed_state() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "d", TargetStatus::Checked);
        let sel = set_node_status(&tree, &sel, "c", TargetStatus::Unchecked);

        assert_eq!(sel.status("c"), Unchecked);
        assert_eq!(sel.status("d"), Unchecked);
        assert_eq!(sel.status("e"), Unchecked);
        assert_eq!(sel.status("a"), Unchecked);
        assert_eq!(sel.get("e"), Some(Unchecked));
    }

    #[test]
    fn prior_map_is_untouched() {
        let tree = sample_tree();
        let prior = SelectionMap::new().with("b", Checked);
        let _ = set_node_status(&tree, &prior, "d", TargetStatus::Checked);
        assert_eq!(prior, SelectionMap::new().with("b", Checked));
    }

    #[test]
    fn childless_branch_keeps_its_entry() {
        let tree = Branch::new("root", "r")
            .with_child(Branch::new("empty", "e"))
            .with_child(Leaf::new("l", "l"));

        let sel = set_node_status(&tree, &SelectionMap::new(), "empty", TargetStatus::Checked);
        assert_eq!(sel.status("empty"), Checked);
        assert_eq!(sel.status("root"), Indeterminate);

        let sel = set_node_status(&tree, &sel, "l", TargetStatus::Checked);
        assert_eq!(sel.status("empty"), Checked);
        assert_eq!(sel.status("root"), Checked);
    }

    #[test]
    fn unknown_target_only_rederives() {
        let tree = sample_tree();
        let prior = SelectionMap::new().with("d", Checked).with("e", Checked);
        let sel = set_node_status(&tree, &prior, "missing", TargetStatus::Checked);

        assert_eq!(sel.status("c"), Checked);
        assert_eq!(sel.status("a"), Indeterminate);
        assert_eq!(sel.get("missing"), None);
    }

    #[test]
    fn stale_entries_stay_inert() {
        let tree = sample_tree();
        let prior = SelectionMap::new().with("gone", Checked);
        let sel = set_node_status(&tree, &prior, "b", TargetStatus::Checked);
        assert_eq!(sel.get("gone"), Some(Checked));
        assert_eq!(sel.status("a"), Indeterminate);
    }

    #[test]
    fn checked_roots_skip_descendants() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "c", TargetStatus::Checked);
        assert_eq!(checked_branch_roots(&tree, &sel), vec![NodeId::from("c")]);

        let sel = set_node_status(&tree, &sel, "b", TargetStatus::Checked);
        assert_eq!(checked_branch_roots(&tree, &sel), vec![NodeId::from("root")]);
    }

    #[test]
    fn checked_roots_in_pre_order() {
        let tree = sample_tree();
        let sel = set_node_status(&tree, &SelectionMap::new(), "e", TargetStatus::Checked);
        let sel = set_node_status(&tree, &sel, "b", TargetStatus::Checked);
        assert_eq!(
            checked_branch_roots(&tree, &sel),
            vec![NodeId::from("b"), NodeId::from("e")]
        );
    }
}
