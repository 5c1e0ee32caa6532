//! Tagtree Optimistic Update Coordinator
//!
//! Keeps a local cache of tree documents and applies structural edits to it
//! before the remote store confirms them.
//!
//! # Core Concepts
//!
//! - [`TreeTransport`]: async seam to the remote store
//! - [`TreeCache`]: per-tree slot with generation, journal and fetch tickets
//! - [`OptimisticCoordinator`]: snapshot, apply, send, commit or roll back, refetch
//! - [`MutationPhase`]: `Idle -> Pending -> {Committed | RolledBack} -> Idle`
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagtree_model::TreeId;
//! use tagtree_sync::OptimisticCoordinator;
//!
//! let coordinator = OptimisticCoordinator::new(Arc::new(transport));
//! let tree = TreeId::from("tags");
//! coordinator.load(&tree).await?;
//!
//! // the cache reflects the delete immediately; on failure it is undone
//! match coordinator.delete_node(&tree, "obsolete").await {
//!     Ok(outcome) => println!("{} committed", outcome.id),
//!     Err(err) if err.is_rollback() => eprintln!("{err}"),
//!     Err(err) => return Err(err.into()),
//! }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod cache;
mod config;
mod coordinator;
mod error;
mod phase;
mod transport;

pub use cache::{CacheEvent, CacheEventKind, FetchTicket, RollbackKind, TreeCache};
pub use config::SyncConfig;
pub use coordinator::{MutationOutcome, OptimisticCoordinator};
pub use error::{SyncError, TransportError};
pub use phase::{allowed_transitions, validate_transition, MutationId, MutationPhase, MutationRecord};
pub use transport::TreeTransport;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
