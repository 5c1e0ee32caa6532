//! Node removal and leaf field updates
//!
//! Both operations rebuild the tree and never touch their input. Children
//! that are not affected are cloned as-is, so the result compares equal to
//! the input everywhere outside the edited region.

use crate::error::MutationError;
use std::collections::BTreeSet;
use tagtree_model::{Branch, LeafPatch, Node, NodeId};

/// Remove every node whose id is in `ids`, together with its subtree
///
/// Pre-order: at each branch the matching children are filtered out first,
/// then the surviving branch children are visited. A cut subtree is never
/// visited, so ids below an already-removed node need no extra work.
/// Ids that match nothing are ignored.
///
/// Leaf counts no longer hold after a removal, so every branch in the
/// result has `count` cleared; run `annotate_with_counts` to restore them.
///
/// # Errors
/// - `MutationError::RootRemoval` if `ids` contains the root id
pub fn remove_nodes(tree: &Branch, ids: &BTreeSet<NodeId>) -> Result<Branch, MutationError> {
    if ids.contains(&tree.id) {
        return Err(MutationError::RootRemoval(tree.id.clone()));
    }
    Ok(remove_from_branch(tree, ids))
}

fn remove_from_branch(branch: &Branch, ids: &BTreeSet<NodeId>) -> Branch {
    let children = branch
        .children
        .iter()
        .filter(|child| !ids.contains(child.id()))
        .map(|child| match child {
            Node::Branch(sub) => Node::Branch(remove_from_branch(sub, ids)),
            Node::Leaf(_) => child.clone(),
        })
        .collect();

    Branch {
        children,
        count: None,
        ..shallow(branch)
    }
}

/// Merge `patch` into the leaf with id `leaf_id`
///
/// Only leaves match; a branch with that id is left alone. If nothing
/// matches, the returned tree equals the input.
#[must_use]
pub fn update_leaf_fields(tree: &Branch, leaf_id: &NodeId, patch: &LeafPatch) -> Branch {
    let children = tree
        .children
        .iter()
        .map(|child| match child {
            Node::Branch(sub) => Node::Branch(update_leaf_fields(sub, leaf_id, patch)),
            Node::Leaf(leaf) if &leaf.id == leaf_id => Node::Leaf(patch.merged_into(leaf)),
            Node::Leaf(_) => child.clone(),
        })
        .collect();

    Branch {
        children,
        ..shallow(tree)
    }
}

/// Copy of a branch's own fields with no children
fn shallow(branch: &Branch) -> Branch {
    Branch {
        id: branch.id.clone(),
        name: branch.name.clone(),
        color: branch.color.clone(),
        children: Vec::new(),
        count: branch.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagtree_model::Leaf;
    use tagtree_test_utils::{ids, sample_tree};

    #[test]
    fn removing_branch_drops_its_subtree() {
        let tree = Branch::new("root", "root").with_child(
            Branch::new("a", "A")
                .with_child(Leaf::new("b", "B"))
                .with_child(Leaf::new("c", "C")),
        );

        let pruned = remove_nodes(&tree, &ids(&["a"])).unwrap();
        assert_eq!(pruned, Branch::new("root", "root"));
    }

    #[test]
    fn removing_nested_leaf_keeps_siblings() {
        let tree = sample_tree();
        let pruned = remove_nodes(&tree, &ids(&["d"])).unwrap();

        assert!(!pruned.contains("d"));
        for kept in ["a", "b", "c", "e"] {
            assert!(pruned.contains(kept), "{kept} should survive");
        }
    }

    #[test]
    fn removing_parent_and_child_together() {
        let tree = sample_tree();
        let pruned = remove_nodes(&tree, &ids(&["c", "d"])).unwrap();
        assert!(!pruned.contains("c"));
        assert!(!pruned.contains("d"));
        assert!(!pruned.contains("e"));
        assert!(pruned.contains("b"));
    }

    #[test]
    fn removal_clears_stale_counts() {
        let tree = crate::annotate_with_counts(&sample_tree());
        assert_eq!(tree.count, Some(3));

        let pruned = remove_nodes(&tree, &ids(&["d"])).unwrap();
        assert_eq!(pruned.count, None);
        assert!(pruned.descendants().all(|n| n.as_branch().map_or(true, |b| b.count.is_none())));
        assert_eq!(crate::annotate_with_counts(&pruned).count, Some(2));
    }

    #[test]
    fn unknown_ids_filter_nothing() {
        let tree = sample_tree();
        assert_eq!(remove_nodes(&tree, &ids(&["nope"])).unwrap(), tree);
        assert_eq!(remove_nodes(&tree, &BTreeSet::new()).unwrap(), tree);
    }

    #[test]
    fn root_removal_is_rejected() {
        let tree = sample_tree();
        assert_eq!(
            remove_nodes(&tree, &ids(&["root", "a"])),
            Err(MutationError::RootRemoval(NodeId::from("root")))
        );
    }

    #[test]
    fn update_merges_into_matching_leaf() {
        let tree = sample_tree();
        let patch = LeafPatch::new().name("Dee").secondary_information("renamed");
        let updated = update_leaf_fields(&tree, &NodeId::from("d"), &patch);

        let leaf = updated.find("d").and_then(Node::as_leaf).unwrap();
        assert_eq!(leaf.name, "Dee");
        assert_eq!(leaf.secondary_information, "renamed");
        assert_eq!(updated.find("e"), tree.find("e"));
    }

    #[test]
    fn update_ignores_branch_ids() {
        let tree = sample_tree();
        let updated = update_leaf_fields(&tree, &NodeId::from("c"), &LeafPatch::new().name("x"));
        assert_eq!(updated, tree);
    }

    #[test]
    fn update_unknown_leaf_is_noop() {
        let tree = sample_tree();
        let updated = update_leaf_fields(&tree, &NodeId::from("zzz"), &LeafPatch::new().name("x"));
        assert_eq!(updated, tree);
    }
}
