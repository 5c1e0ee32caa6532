//! Tagtree Selection State Engine
//!
//! Tri-state (checked / unchecked / indeterminate) selection over a tag tree.
//!
//! # Core Concepts
//!
//! - [`SelectionStatus`]: per-node state; absent entries read as unchecked
//! - [`SelectionMap`]: persistent id to status map, cheap to copy
//! - [`set_node_status`]: pure recomputation after one toggle
//! - [`checked_branch_roots`]: minimal id set covering every checked subtree
//! - [`SelectionSession`]: explicitly owned context for one rendered tree
//!
//! # Example
//!
//! ```rust
//! use tagtree_model::{Branch, Leaf};
//! use tagtree_selection::{set_node_status, SelectionMap, SelectionStatus, TargetStatus};
//!
//! let tree = Branch::new("root", "Tags").with_child(
//!     Branch::new("c", "C")
//!         .with_child(Leaf::new("d", "D"))
//!         .with_child(Leaf::new("e", "E")),
//! );
//!
//! let sel = set_node_status(&tree, &SelectionMap::new(), "d", TargetStatus::Checked);
//! assert_eq!(sel.status("c"), SelectionStatus::Indeterminate);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod map;
mod propagate;
mod session;
mod status;

pub use map::SelectionMap;
pub use propagate::{checked_branch_roots, set_node_status};
pub use session::SelectionSession;
pub use status::{SelectionStatus, TargetStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
