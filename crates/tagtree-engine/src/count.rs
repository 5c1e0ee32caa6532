//! Derived leaf counts
//!
//! `count(branch) = sum(count(child branch)) + number of leaf children`.
//! Counts are display data only: they are attached after every structural
//! change and never trusted from storage.

use tagtree_model::{Branch, Node};

/// Number of leaves strictly below `node`
///
/// A leaf has no descendants and yields 0; as a child it contributes 1
/// to its parent.
#[must_use]
pub fn count_descendant_leaves(node: &Node) -> usize {
    match node {
        Node::Branch(branch) => count_branch_leaves(branch),
        Node::Leaf(_) => 0,
    }
}

/// Number of leaves below a branch
#[must_use]
pub fn count_branch_leaves(branch: &Branch) -> usize {
    branch
        .children
        .iter()
        .map(|child| match child {
            Node::Leaf(_) => 1,
            Node::Branch(sub) => count_branch_leaves(sub),
        })
        .sum()
}

/// Return a copy of the tree with `count` set on every branch
///
/// Bottom-up: each child branch is annotated first and its count reused
/// for the parent. Leaves pass through unchanged.
#[must_use]
pub fn annotate_with_counts(tree: &Branch) -> Branch {
    let mut count = 0;
    let children = tree
        .children
        .iter()
        .map(|child| match child {
            Node::Leaf(_) => {
                count += 1;
                child.clone()
            }
            Node::Branch(sub) => {
                let annotated = annotate_with_counts(sub);
                count += annotated.count.unwrap_or(0);
                Node::Branch(annotated)
            }
        })
        .collect();

    Branch {
        id: tree.id.clone(),
        name: tree.name.clone(),
        color: tree.color.clone(),
        children,
        count: Some(count),
    }
}

/// Return a copy of the tree with every `count` cleared
///
/// Used before persisting, since counts are not part of stored documents.
#[must_use]
pub fn strip_counts(tree: &Branch) -> Branch {
    Branch {
        id: tree.id.clone(),
        name: tree.name.clone(),
        color: tree.color.clone(),
        children: tree
            .children
            .iter()
            .map(|child| match child {
                Node::Branch(sub) => Node::Branch(strip_counts(sub)),
                Node::Leaf(_) => child.clone(),
            })
            .collect(),
        count: None,
    }
}
