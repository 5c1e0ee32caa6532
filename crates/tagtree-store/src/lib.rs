//! Tagtree Document Store
//!
//! Remote-store side of the tag tree system: whole-document storage and the
//! handlers that apply edits to it.
//!
//! # Core Concepts
//!
//! - [`DocumentStore`]: one document per tree id, replaced whole on edit
//! - [`MemoryStore`] / [`JsonFileStore`]: the two backends
//! - [`TreeService`]: get, delete, update-leaf and seed handlers; also an
//!   in-process [`tagtree_sync::TreeTransport`]
//! - [`generate_tree`]: deterministic synthetic documents for seeding
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagtree_store::{MemoryStore, TreeService};
//! use tagtree_sync::OptimisticCoordinator;
//!
//! let service = Arc::new(TreeService::new(Arc::new(MemoryStore::new())));
//! let tree = service.seed(&document).await?;
//!
//! let coordinator = OptimisticCoordinator::new(Arc::clone(&service));
//! coordinator.load(&tree).await?;
//! coordinator.delete_node(&tree, "obsolete").await?;
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod file;
mod generate;
mod memory;
mod service;

pub use config::{StoreBackend, StoreConfig};
pub use document::DocumentStore;
pub use error::StoreError;
pub use file::JsonFileStore;
pub use generate::{generate_tree, GenerateOptions, MAX_GENERATED_NODES};
pub use memory::MemoryStore;
pub use service::TreeService;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
