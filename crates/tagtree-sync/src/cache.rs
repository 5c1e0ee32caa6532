//! Local tree cache with optimistic journal
//!
//! One slot per tree id. A slot holds the current tree value, a generation
//! counter, the fetch ticket that is allowed to land next, and a journal of
//! optimistic mutations that no authoritative fetch has absorbed yet.
//!
//! All methods are synchronous and hold a slot lock only for the duration
//! of one pure tree computation, so no reader can observe a torn tree and no
//! lock is ever held across an await point.
//!
//! # Rollback
//!
//! Every journal entry keeps the tree value it was applied on. Undoing the
//! newest entry swaps that snapshot back in. Undoing an older entry replays
//! the entries applied after it on top of its snapshot, so unrelated
//! mutations survive.

use crate::error::SyncError;
use crate::phase::MutationId;
use dashmap::DashMap;
use std::sync::Arc;
use tagtree_engine::{annotate_with_counts, TreeMutation};
use tagtree_model::{Branch, TreeId};
use tokio::sync::broadcast;

/// Ticket identifying one authoritative fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// What happened to a cached tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEventKind {
    /// Optimistic value written
    Applied(MutationId),
    /// Remote store accepted a mutation
    Committed(MutationId),
    /// Mutation undone; `rebased` is true when later mutations were replayed
    RolledBack {
        /// Undone mutation
        mutation: MutationId,
        /// Later journal entries were replayed on the restored snapshot
        rebased: bool,
    },
    /// Authoritative value accepted
    Refreshed,
    /// Tree no longer exists remotely
    Evicted,
}

/// Notification broadcast on every cache write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEvent {
    /// Affected tree
    pub tree: TreeId,
    /// Slot generation after the write
    pub generation: u64,
    /// Kind of write
    pub kind: CacheEventKind,
}

/// How a rollback was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackKind {
    /// Snapshot swapped back in unchanged
    Restored,
    /// Snapshot restored and this many later mutations replayed on it
    Rebased(usize),
    /// Nothing to undo (entry or slot already gone)
    Skipped,
}

#[derive(Debug, Clone)]
struct JournalEntry {
    id: MutationId,
    mutation: TreeMutation,
    snapshot: Arc<Branch>,
    committed: bool,
}

#[derive(Debug, Default)]
struct TreeSlot {
    tree: Option<Arc<Branch>>,
    generation: u64,
    ticket: u64,
    journal: Vec<JournalEntry>,
}

impl TreeSlot {
    fn store(&mut self, tree: Arc<Branch>) -> u64 {
        debug_assert!(
            tagtree_model::validate_tree(&tree).is_ok(),
            "cache write produced a malformed tree"
        );
        self.tree = Some(tree);
        self.generation += 1;
        self.generation
    }

    /// Forget committed entries with no pending entry ahead of them
    ///
    /// Nothing can roll back past them, so their snapshots are never
    /// needed again.
    fn drain_committed(&mut self) {
        let settled = self.journal.iter().take_while(|e| e.committed).count();
        self.journal.drain(..settled);
    }

    /// Re-apply journal entries from `from` onward starting at `base`
    fn replay(&mut self, from: usize, mut base: Arc<Branch>) -> Arc<Branch> {
        for entry in &mut self.journal[from..] {
            entry.snapshot = Arc::clone(&base);
            match entry.mutation.apply(&base) {
                Ok(next) => base = Arc::new(next),
                Err(err) => {
                    tracing::warn!(mutation = %entry.id, error = %err, "journal entry no longer applies, skipping");
                }
            }
        }
        base
    }
}

/// Shared cache of tree values keyed by tree id
#[derive(Debug)]
pub struct TreeCache {
    slots: DashMap<TreeId, TreeSlot>,
    events: broadcast::Sender<CacheEvent>,
}

impl TreeCache {
    /// Create cache with the given event buffer per subscriber
    #[must_use]
    pub fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            slots: DashMap::new(),
            events,
        }
    }

    /// Subscribe to cache writes
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Current tree value
    #[must_use]
    pub fn get(&self, tree: &TreeId) -> Option<Arc<Branch>> {
        self.slots.get(tree).and_then(|slot| slot.tree.clone())
    }

    /// Generation of the current value (0 if never written)
    #[must_use]
    pub fn generation(&self, tree: &TreeId) -> u64 {
        self.slots.get(tree).map_or(0, |slot| slot.generation)
    }

    /// Number of journal entries not yet absorbed by a fetch
    #[must_use]
    pub fn journal_len(&self, tree: &TreeId) -> usize {
        self.slots.get(tree).map_or(0, |slot| slot.journal.len())
    }

    /// Seed a value directly, discarding any journal
    pub fn prime(&self, tree: TreeId, value: Branch) -> Arc<Branch> {
        let value = Arc::new(annotate_with_counts(&value));
        let mut slot = self.slots.entry(tree.clone()).or_default();
        slot.journal.clear();
        slot.ticket += 1;
        let generation = slot.store(Arc::clone(&value));
        drop(slot);
        self.emit(tree, generation, CacheEventKind::Refreshed);
        value
    }

    /// Apply a mutation optimistically and journal it
    ///
    /// Supersedes any fetch in flight, since its result predates this write.
    ///
    /// # Errors
    /// - `SyncError::NotLoaded` if the tree has no cached value
    /// - `SyncError::InvalidMutation` if the mutation does not apply
    pub fn begin(
        &self,
        tree: &TreeId,
        id: MutationId,
        mutation: &TreeMutation,
    ) -> Result<Arc<Branch>, SyncError> {
        let mut slot = self
            .slots
            .get_mut(tree)
            .ok_or_else(|| SyncError::NotLoaded(tree.clone()))?;
        let snapshot = slot
            .tree
            .clone()
            .ok_or_else(|| SyncError::NotLoaded(tree.clone()))?;

        let next = Arc::new(mutation.apply(&snapshot)?);
        slot.ticket += 1;
        slot.journal.push(JournalEntry {
            id,
            mutation: mutation.clone(),
            snapshot,
            committed: false,
        });
        let generation = slot.store(Arc::clone(&next));
        drop(slot);

        self.emit(tree.clone(), generation, CacheEventKind::Applied(id));
        Ok(next)
    }

    /// Mark a journaled mutation as accepted by the remote store
    ///
    /// Committed entries at the head of the journal are dropped right away.
    pub fn commit(&self, tree: &TreeId, id: MutationId) {
        let Some(mut slot) = self.slots.get_mut(tree) else {
            return;
        };
        if let Some(entry) = slot.journal.iter_mut().find(|e| e.id == id) {
            entry.committed = true;
        }
        slot.drain_committed();
        let generation = slot.generation;
        drop(slot);
        self.emit(tree.clone(), generation, CacheEventKind::Committed(id));
    }

    /// Undo a journaled mutation
    pub fn rollback(&self, tree: &TreeId, id: MutationId) -> RollbackKind {
        let Some(mut slot) = self.slots.get_mut(tree) else {
            return RollbackKind::Skipped;
        };
        let Some(index) = slot.journal.iter().position(|e| e.id == id) else {
            return RollbackKind::Skipped;
        };

        let entry = slot.journal.remove(index);
        let later = slot.journal.len() - index;
        let (restored, kind) = if later == 0 {
            (entry.snapshot, RollbackKind::Restored)
        } else {
            (slot.replay(index, entry.snapshot), RollbackKind::Rebased(later))
        };
        let generation = slot.store(restored);
        slot.drain_committed();
        drop(slot);

        self.emit(
            tree.clone(),
            generation,
            CacheEventKind::RolledBack {
                mutation: id,
                rebased: later > 0,
            },
        );
        kind
    }

    /// Reserve the right to land the next authoritative value
    ///
    /// Only the most recently issued ticket can land; older fetches resolve
    /// into nothing.
    pub fn issue_ticket(&self, tree: &TreeId) -> FetchTicket {
        let mut slot = self.slots.entry(tree.clone()).or_default();
        slot.ticket += 1;
        FetchTicket(slot.ticket)
    }

    /// Land an authoritative value if `ticket` is still current
    ///
    /// Committed journal entries are dropped (the server copy contains them)
    /// and still-pending ones are replayed on top of it. Returns the new
    /// value, or `None` if the ticket was superseded.
    pub fn accept_fetch(
        &self,
        tree: &TreeId,
        ticket: FetchTicket,
        fetched: &Branch,
    ) -> Option<Arc<Branch>> {
        let mut slot = self.slots.get_mut(tree)?;
        if slot.ticket != ticket.0 {
            tracing::debug!(tree = %tree, ticket = ticket.0, current = slot.ticket, "dropping stale fetch result");
            return None;
        }

        slot.journal.retain(|e| !e.committed);
        let base = Arc::new(annotate_with_counts(fetched));
        let value = slot.replay(0, base);
        let generation = slot.store(Arc::clone(&value));
        drop(slot);

        self.emit(tree.clone(), generation, CacheEventKind::Refreshed);
        Some(value)
    }

    /// Drop a tree that no longer exists remotely, if `ticket` is current
    pub fn evict(&self, tree: &TreeId, ticket: FetchTicket) -> bool {
        let removed = self
            .slots
            .remove_if(tree, |_, slot| slot.ticket == ticket.0)
            .map(|(_, slot)| slot.generation);
        match removed {
            Some(generation) => {
                self.emit(tree.clone(), generation, CacheEventKind::Evicted);
                true
            }
            None => false,
        }
    }

    fn emit(&self, tree: TreeId, generation: u64, kind: CacheEventKind) {
        // no subscribers is fine
        let _ = self.events.send(CacheEvent {
            tree,
            generation,
            kind,
        });
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new(64)
    }
}
