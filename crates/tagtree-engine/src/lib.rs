//! Tagtree Structural Mutation Engine
//!
//! Pure, side-effect-free transformations over [`tagtree_model::Branch`]
//! trees. Every function returns a new tree and leaves its input intact.
//!
//! # Operations
//!
//! - [`remove_nodes`]: cut nodes and their subtrees
//! - [`update_leaf_fields`]: merge a [`tagtree_model::LeafPatch`] into one leaf
//! - [`count_descendant_leaves`] / [`annotate_with_counts`]: derived counts
//! - [`TreeMutation`]: one edit as a value, applied with fresh counts
//!
//! # Example
//!
//! ```rust
//! use tagtree_engine::TreeMutation;
//! use tagtree_model::{Branch, Leaf};
//!
//! let tree = Branch::new("root", "Tags")
//!     .with_child(Branch::new("a", "A").with_child(Leaf::new("b", "B")));
//!
//! let edited = TreeMutation::delete_one("a").apply(&tree).unwrap();
//! assert!(edited.children.is_empty());
//! assert_eq!(edited.count, Some(0));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod count;
mod error;
mod mutation;
mod operation;

pub use count::{annotate_with_counts, count_branch_leaves, count_descendant_leaves, strip_counts};
pub use error::MutationError;
pub use mutation::{remove_nodes, update_leaf_fields};
pub use operation::TreeMutation;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
