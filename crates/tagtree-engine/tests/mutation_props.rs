use std::collections::BTreeSet;
use tagtree_engine::{
    annotate_with_counts, count_branch_leaves, count_descendant_leaves, remove_nodes,
    update_leaf_fields,
};
use tagtree_model::{Branch, LeafPatch, Node, NodeId};
use proptest::prelude::*;
use tagtree_test_utils::{arb_tree, arb_tree_with_picks, leaf_ids};

/// Ids of `tree` that sit inside a removed subtree
fn removed_closure(tree: &Branch, cut: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    fn walk(node: &Node, cut: &BTreeSet<NodeId>, inside: bool, out: &mut BTreeSet<NodeId>) {
        let inside = inside || cut.contains(node.id());
        if inside {
            out.insert(node.id().clone());
        }
        for child in node.children() {
            walk(child, cut, inside, out);
        }
    }
    let mut out = BTreeSet::new();
    for child in &tree.children {
        walk(child, cut, false, &mut out);
    }
    out
}

fn check_counts(branch: &Branch) -> bool {
    branch.count == Some(count_branch_leaves(branch))
        && branch
            .children
            .iter()
            .filter_map(Node::as_branch)
            .all(check_counts)
}

proptest! {
    #[test]
    fn prop_annotated_counts_match_leaf_totals(tree in arb_tree()) {
        let annotated = annotate_with_counts(&tree);
        prop_assert!(check_counts(&annotated));
        prop_assert_eq!(annotated.count, Some(leaf_ids(&tree).len()));
    }

    #[test]
    fn prop_removing_nothing_changes_nothing(tree in arb_tree()) {
        let same = remove_nodes(&tree, &BTreeSet::new()).unwrap();
        prop_assert_eq!(
            count_descendant_leaves(&Node::Branch(tree.clone())),
            count_descendant_leaves(&Node::Branch(same.clone()))
        );
        prop_assert_eq!(same, tree);
    }

    #[test]
    fn prop_removed_ids_and_descendants_are_gone((tree, picks) in arb_tree_with_picks()) {
        let cut: BTreeSet<NodeId> = picks.into_iter().collect();
        let gone = removed_closure(&tree, &cut);
        let pruned = remove_nodes(&tree, &cut).unwrap();

        for node in tree.descendants() {
            let id = node.id();
            if gone.contains(id) {
                prop_assert!(!pruned.contains(id.as_str()), "{} survived", id);
            } else {
                // Survivors keep their own fields; their child lists only lose cut nodes.
                let kept = pruned.find(id.as_str());
                prop_assert!(kept.is_some(), "{} vanished", id);
                let kept = kept.unwrap();
                prop_assert_eq!(kept.name(), node.name());
                if let (Some(before), Some(after)) = (node.as_leaf(), kept.as_leaf()) {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn prop_update_touches_only_target((tree, picks) in arb_tree_with_picks()) {
        let patch = LeafPatch::new().name("patched").secondary_information("note");
        for target in &picks {
            let updated = update_leaf_fields(&tree, target, &patch);
            for (before, after) in tree.descendants().zip(updated.descendants()) {
                prop_assert_eq!(before.id(), after.id());
                match (before, after) {
                    (Node::Leaf(b), Node::Leaf(a)) if &b.id == target => {
                        prop_assert_eq!(&a.name, "patched");
                        prop_assert_eq!(&a.secondary_information, "note");
                        prop_assert_eq!(a.is_training, b.is_training);
                    }
                    (Node::Leaf(b), Node::Leaf(a)) => {
                        prop_assert_eq!(a, b);
                    }
                    (Node::Branch(b), Node::Branch(a)) => {
                        prop_assert_eq!(&a.name, &b.name);
                    }
                    _ => {
                        prop_assert!(false, "node kind changed");
                    }
                }
            }
        }
    }
}
