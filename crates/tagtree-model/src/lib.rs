//! Tagtree Model
//!
//! Shapes and structural invariants of a tag tree.
//!
//! # Core Concepts
//!
//! - [`Node`]: tagged union over [`Branch`] and [`Leaf`]
//! - [`Branch`]: ordered children, optional color, transient leaf `count`
//! - [`Leaf`]: `isTraining` flag and `secondaryInformation` text
//! - [`NodeId`] / [`TreeId`]: string identifiers
//! - [`LeafPatch`]: partial leaf update
//!
//! # Invariants
//!
//! A tree is a single rooted [`Branch`]. Every node has exactly one parent
//! (enforced by ownership) and ids are unique across the whole tree
//! (checked by [`validate_tree`]).
//!
//! # Example
//!
//! ```rust
//! use tagtree_model::{Branch, Leaf, validate_tree};
//!
//! let tree = Branch::new("root", "Tags")
//!     .with_child(Branch::new("animals", "Animals").with_child(Leaf::new("cat", "Cat")));
//!
//! assert!(validate_tree(&tree).is_ok());
//! assert!(tree.contains("cat"));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod id;
mod node;
mod patch;
mod validate;

pub use id::{NodeId, TreeId};
pub use node::{Branch, Descendants, Leaf, Node};
pub use patch::LeafPatch;
pub use validate::{parse_tree, validate_tree, ModelError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
