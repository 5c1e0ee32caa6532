//! Optimistic update coordinator
//!
//! Runs one mutation through its whole lifecycle:
//! 1. Project the edit into the cache before the network call
//! 2. Send it through the transport
//! 3. Commit, or roll back to the snapshot the mutation started from
//! 4. Refetch the authoritative tree and reconcile
//!
//! Several mutations may be pending on the same tree at once. Each one
//! snapshots the cache value current when it started, and the cache journal
//! makes sure undoing one never discards another.

use crate::cache::{CacheEvent, TreeCache};
use crate::config::SyncConfig;
use crate::error::{SyncError, TransportError};
use crate::phase::{MutationId, MutationPhase, MutationRecord};
use crate::transport::TreeTransport;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tagtree_engine::TreeMutation;
use tagtree_model::{validate_tree, Branch, LeafPatch, NodeId, TreeId};
use tokio::sync::broadcast;

/// Result of a mutation the remote store accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Mutation id
    pub id: MutationId,
    /// Settled phase
    pub phase: MutationPhase,
    /// Whether the follow-up authoritative fetch landed in the cache
    pub reconciled: bool,
}

/// Coordinates optimistic edits against one transport
#[derive(Debug)]
pub struct OptimisticCoordinator<T: ?Sized> {
    transport: Arc<T>,
    cache: Arc<TreeCache>,
    config: SyncConfig,
    next_id: AtomicU64,
    in_flight: DashMap<MutationId, MutationRecord>,
}

impl<T: TreeTransport + ?Sized> OptimisticCoordinator<T> {
    /// Create coordinator with default configuration
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_config(transport, SyncConfig::default())
    }

    /// Create coordinator with explicit configuration
    #[must_use]
    pub fn with_config(transport: Arc<T>, config: SyncConfig) -> Self {
        Self {
            transport,
            cache: Arc::new(TreeCache::new(config.event_capacity)),
            config,
            next_id: AtomicU64::new(0),
            in_flight: DashMap::new(),
        }
    }

    /// Shared cache
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<TreeCache> {
        &self.cache
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current cached value of a tree
    #[must_use]
    pub fn cached(&self, tree: &TreeId) -> Option<Arc<Branch>> {
        self.cache.get(tree)
    }

    /// Mutations that have started but not yet returned to `Idle`
    #[must_use]
    pub fn in_flight(&self) -> Vec<MutationRecord> {
        let mut records: Vec<_> = self.in_flight.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Subscribe to cache writes
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.cache.subscribe()
    }

    /// Fetch a tree and make it the cached value
    ///
    /// If a newer write lands while the fetch is in flight, the newer cached
    /// value is returned instead.
    ///
    /// # Errors
    /// - `SyncError::Fetch` if the transport fails
    /// - `SyncError::Malformed` if the document breaks tree invariants
    /// - `SyncError::NotLoaded` if the fetch was superseded and nothing is cached
    pub async fn load(&self, tree: &TreeId) -> Result<Arc<Branch>, SyncError> {
        match self.refresh(tree).await? {
            Some(value) => Ok(value),
            None => self
                .cache
                .get(tree)
                .ok_or_else(|| SyncError::NotLoaded(tree.clone())),
        }
    }

    /// Refetch the authoritative tree
    ///
    /// Returns `None` when the result arrived after a newer fetch or
    /// mutation and was dropped. A tree the store no longer has is evicted.
    ///
    /// # Errors
    /// - `SyncError::Fetch` if the transport fails
    /// - `SyncError::Malformed` if the document breaks tree invariants
    pub async fn refresh(&self, tree: &TreeId) -> Result<Option<Arc<Branch>>, SyncError> {
        let ticket = self.cache.issue_ticket(tree);
        match self.bounded(self.transport.fetch_tree(tree)).await {
            Ok(fetched) => {
                validate_tree(&fetched)?;
                Ok(self.cache.accept_fetch(tree, ticket, &fetched))
            }
            Err(err @ TransportError::NotFound(_)) => {
                if self.cache.evict(tree, ticket) {
                    tracing::info!("Tree {} no longer exists, evicted from cache", tree);
                }
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete one node optimistically
    ///
    /// # Errors
    /// See [`Self::mutate`].
    pub async fn delete_node(
        &self,
        tree: &TreeId,
        id: impl Into<NodeId>,
    ) -> Result<MutationOutcome, SyncError> {
        self.mutate(tree, TreeMutation::delete_one(id)).await
    }

    /// Delete several nodes optimistically
    ///
    /// # Errors
    /// See [`Self::mutate`].
    pub async fn delete_nodes(
        &self,
        tree: &TreeId,
        ids: BTreeSet<NodeId>,
    ) -> Result<MutationOutcome, SyncError> {
        self.mutate(tree, TreeMutation::DeleteNodes { ids }).await
    }

    /// Patch a leaf optimistically
    ///
    /// # Errors
    /// See [`Self::mutate`].
    pub async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: impl Into<NodeId>,
        patch: LeafPatch,
    ) -> Result<MutationOutcome, SyncError> {
        self.mutate(tree, TreeMutation::update_leaf(leaf, patch)).await
    }

    /// Run one mutation through `Idle -> Pending -> settled -> Idle`
    ///
    /// The cache holds the projected tree before this future first yields.
    ///
    /// # Errors
    /// - `SyncError::NotLoaded` if the tree is not cached
    /// - `SyncError::InvalidMutation` if the edit is rejected locally
    ///   (nothing is sent)
    /// - `SyncError::RolledBack` if the transport failed; the cache no
    ///   longer contains the edit
    pub async fn mutate(
        &self,
        tree: &TreeId,
        mutation: TreeMutation,
    ) -> Result<MutationOutcome, SyncError> {
        let id = MutationId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let mut record = MutationRecord::new(id, tree.clone(), mutation.kind());
        record.advance(MutationPhase::Pending)?;

        self.cache.begin(tree, id, &mutation)?;
        let mut guard = PendingGuard::new(&self.cache, &self.in_flight, tree, record);
        tracing::info!("Mutation {} pending on {}: {}", id, tree, mutation);

        let sent = self.send(tree, &mutation).await;
        let failure = match sent {
            Ok(()) => {
                self.cache.commit(tree, id);
                guard.settle(MutationPhase::Committed)?;
                tracing::info!("Mutation {} committed", id);
                None
            }
            Err(err) => {
                let undo = self.cache.rollback(tree, id);
                guard.settle(MutationPhase::RolledBack)?;
                tracing::warn!("Mutation {} rolled back ({:?}): {}", id, undo, err);
                Some(err)
            }
        };

        let reconciled = self.reconcile(tree).await;
        drop(guard);

        match failure {
            None => Ok(MutationOutcome {
                id,
                phase: MutationPhase::Committed,
                reconciled,
            }),
            Some(source) => Err(SyncError::RolledBack {
                mutation: id,
                source,
                reconciled,
            }),
        }
    }

    async fn send(&self, tree: &TreeId, mutation: &TreeMutation) -> Result<(), TransportError> {
        match mutation {
            TreeMutation::DeleteNodes { ids } => {
                self.bounded(self.transport.delete_nodes(tree, ids)).await
            }
            TreeMutation::UpdateLeaf { leaf, patch } => {
                self.bounded(self.transport.update_leaf(tree, leaf, patch)).await
            }
        }
    }

    async fn reconcile(&self, tree: &TreeId) -> bool {
        if !self.config.refetch_on_settle {
            return false;
        }
        match self.refresh(tree).await {
            Ok(landed) => landed.is_some(),
            Err(err) => {
                tracing::warn!("Reconcile fetch for {} failed: {}", tree, err);
                false
            }
        }
    }

    async fn bounded<R, F>(&self, call: F) -> Result<R, TransportError>
    where
        F: Future<Output = Result<R, TransportError>>,
    {
        match tokio::time::timeout(self.config.request_timeout(), call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                after_ms: self.config.request_timeout_ms,
            }),
        }
    }
}

/// Keeps one mutation registered as in flight
///
/// A mutation future dropped before it settles (caller timeout, `select!`,
/// aborted task) rolls its optimistic edit back here, so the journal never
/// keeps an entry nobody will resolve.
struct PendingGuard<'a> {
    cache: &'a TreeCache,
    in_flight: &'a DashMap<MutationId, MutationRecord>,
    tree: &'a TreeId,
    id: MutationId,
    settled: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(
        cache: &'a TreeCache,
        in_flight: &'a DashMap<MutationId, MutationRecord>,
        tree: &'a TreeId,
        record: MutationRecord,
    ) -> Self {
        let id = record.id;
        in_flight.insert(id, record);
        Self {
            cache,
            in_flight,
            tree,
            id,
            settled: false,
        }
    }

    fn settle(&mut self, phase: MutationPhase) -> Result<(), SyncError> {
        self.settled = true;
        match self.in_flight.get_mut(&self.id) {
            Some(mut record) => record.advance(phase),
            None => Ok(()),
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let undo = self.cache.rollback(self.tree, self.id);
            tracing::warn!("Mutation {} cancelled while pending, rolled back ({:?})", self.id, undo);
        }
        self.in_flight.remove(&self.id);
    }
}
