//! Synthetic tree documents for seeding
//!
//! Produces a balanced tree: `depth` levels of branches under the root,
//! each with `branching` children, and `leaves` leaves on every branch of
//! the deepest level. Output is deterministic for the same options.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use tagtree_model::{Branch, Leaf, Node};

/// Largest tree [`generate_tree`] will build
pub const MAX_GENERATED_NODES: usize = 100_000;

const PALETTE: [&str; 10] = [
    "fec5bb", "fcd5ce", "fae1dd", "f8edeb", "e8e8e4", "d8e2dc", "ece4db", "ffe5d9", "ffd7ba",
    "fec89a",
];

const QUALIFIERS: [&str; 5] = ["primary", "secondary", "legacy", "experimental", "derived"];

/// Shape of a generated tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Child branches per branch
    pub branching: usize,
    /// Branch levels below the root
    pub depth: usize,
    /// Leaves on each deepest branch
    pub leaves: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            branching: 2,
            depth: 2,
            leaves: 2,
        }
    }
}

impl GenerateOptions {
    /// Number of leaves the generated tree will hold
    #[must_use]
    pub fn leaf_total(&self) -> usize {
        self.branching
            .saturating_pow(u32::try_from(self.depth).unwrap_or(u32::MAX))
            .saturating_mul(self.leaves)
    }

    /// Number of nodes the generated tree will hold, root included
    #[must_use]
    pub fn node_total(&self) -> usize {
        let mut total: usize = 1;
        let mut width: usize = 1;
        for _ in 0..self.depth {
            width = width.saturating_mul(self.branching);
            total = total.saturating_add(width);
            if total == usize::MAX {
                return total;
            }
        }
        total.saturating_add(self.leaf_total())
    }
}

/// Build a tree whose root id is `tree_id`
///
/// # Errors
/// - `StoreError::TooLarge` if the tree would exceed [`MAX_GENERATED_NODES`]
pub fn generate_tree(tree_id: &str, options: &GenerateOptions) -> Result<Branch, StoreError> {
    let nodes = options.node_total();
    if nodes > MAX_GENERATED_NODES {
        return Err(StoreError::TooLarge {
            nodes,
            limit: MAX_GENERATED_NODES,
        });
    }

    let mut seq = 0;
    let root = Branch::new(tree_id, "Tags").with_color(PALETTE[0]);
    let children = level(tree_id, options, options.depth, &mut seq);
    Ok(root.with_children(children))
}

fn level(prefix: &str, options: &GenerateOptions, remaining: usize, seq: &mut usize) -> Vec<Node> {
    if remaining == 0 {
        return (1..=options.leaves)
            .map(|i| {
                *seq += 1;
                Leaf::new(format!("{prefix}.{i}"), format!("Tag {}", *seq))
                    .training(*seq % 2 == 0)
                    .with_secondary(QUALIFIERS[*seq % QUALIFIERS.len()])
                    .into()
            })
            .collect();
    }

    (1..=options.branching)
        .map(|i| {
            *seq += 1;
            let id = format!("{prefix}.{i}");
            let branch = Branch::new(id.as_str(), format!("Group {}", *seq))
                .with_color(PALETTE[*seq % PALETTE.len()]);
            let children = level(&id, options, remaining - 1, seq);
            branch.with_children(children).into()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagtree_model::validate_tree;

    #[test]
    fn default_shape_matches_leaf_total() {
        let options = GenerateOptions::default();
        let tree = generate_tree("demo", &options).unwrap();

        assert!(validate_tree(&tree).is_ok());
        let leaves = tree.descendants().filter(|n| n.is_leaf()).count();
        assert_eq!(leaves, options.leaf_total());
        assert_eq!(leaves, 8);
        // root + 2 + 4 branches + 8 leaves
        assert_eq!(tree.node_count(), 15);
        assert_eq!(options.node_total(), 15);
    }

    #[test]
    fn deterministic() {
        let options = GenerateOptions {
            branching: 3,
            depth: 1,
            leaves: 4,
        };
        assert_eq!(
            generate_tree("t", &options).unwrap(),
            generate_tree("t", &options).unwrap()
        );
    }

    #[test]
    fn zero_depth_is_flat() {
        let options = GenerateOptions {
            branching: 5,
            depth: 0,
            leaves: 3,
        };
        let tree = generate_tree("flat", &options).unwrap();
        assert_eq!(tree.children.len(), 3);
        assert!(tree.children.iter().all(Node::is_leaf));
    }

    #[test]
    fn oversized_shape_is_refused() {
        let options = GenerateOptions {
            branching: 1000,
            depth: 10,
            leaves: 2,
        };
        assert_eq!(options.node_total(), usize::MAX);
        let err = generate_tree("huge", &options).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TooLarge {
                limit: MAX_GENERATED_NODES,
                ..
            }
        ));

        // wide but shallow trees with no leaves are counted too
        let wide = GenerateOptions {
            branching: 1_000_000,
            depth: 1,
            leaves: 0,
        };
        assert!(generate_tree("wide", &wide).is_err());
    }
}
