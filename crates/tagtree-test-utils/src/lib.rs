//! Testing utilities for the tagtree workspace
//!
//! Shared fixtures, proptest strategies and a fault-injecting transport.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tagtree_model::{Branch, Leaf, LeafPatch, Node, NodeId, TreeId};
use tagtree_sync::{TransportError, TreeTransport};
use tokio::sync::Notify;

/// `root(a(b, c(d, e)))` where `b`, `d` and `e` are leaves
pub fn sample_tree() -> Branch {
    Branch::new("root", "root").with_child(
        Branch::new("a", "A")
            .with_color("#4caf50")
            .with_child(Leaf::new("b", "B").with_secondary("first"))
            .with_child(
                Branch::new("c", "C")
                    .with_child(Leaf::new("d", "D").training(true))
                    .with_child(Leaf::new("e", "E")),
            ),
    )
}

pub fn ids(raw: &[&str]) -> BTreeSet<NodeId> {
    raw.iter().copied().map(NodeId::from).collect()
}

pub fn leaf_ids(tree: &Branch) -> BTreeSet<NodeId> {
    tree.descendants()
        .filter_map(Node::as_leaf)
        .map(|leaf| leaf.id.clone())
        .collect()
}

#[derive(Debug, Clone)]
enum Shape {
    Leaf(bool),
    Branch(Vec<Shape>),
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    any::<bool>()
        .prop_map(Shape::Leaf)
        .prop_recursive(4, 40, 5, |inner| {
            prop::collection::vec(inner, 0..5).prop_map(Shape::Branch)
        })
}

fn build(shape: &Shape, next: &mut usize) -> Node {
    *next += 1;
    let id = format!("n{next}");
    match shape {
        Shape::Leaf(training) => Leaf::new(id.as_str(), id.to_uppercase())
            .training(*training)
            .into(),
        Shape::Branch(children) => {
            let branch = Branch::new(id.as_str(), id.to_uppercase());
            let children = children.iter().map(|c| build(c, next)).collect();
            branch.with_children(children).into()
        }
    }
}

/// Arbitrary tree rooted at `root` with unique ids
pub fn arb_tree() -> impl Strategy<Value = Branch> {
    prop::collection::vec(arb_shape(), 0..6).prop_map(|shapes| {
        let mut next = 0;
        let children = shapes.iter().map(|s| build(s, &mut next)).collect();
        Branch::new("root", "root").with_children(children)
    })
}

/// Arbitrary tree plus up to five descendant ids picked from it (never the root)
pub fn arb_tree_with_picks() -> impl Strategy<Value = (Branch, Vec<NodeId>)> {
    arb_tree().prop_flat_map(|tree| {
        let ids: Vec<NodeId> = tree.descendants().map(|n| n.id().clone()).collect();
        let picks = if ids.is_empty() {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec(prop::sample::select(ids), 0..6).boxed()
        };
        (Just(tree), picks)
    })
}

/// Transport wrapper that injects failures and holds fetches back
///
/// Mutation calls consume queued failures first and only reach the inner
/// transport when none are queued.
pub struct FlakyTransport<T: ?Sized> {
    inner: Arc<T>,
    failures: Mutex<VecDeque<TransportError>>,
    held_fetch: Mutex<Option<Arc<Notify>>>,
    fetches: AtomicUsize,
    mutations: AtomicUsize,
}

impl<T: TreeTransport + ?Sized> FlakyTransport<T> {
    pub fn new(inner: Arc<T>) -> Self {
        Self {
            inner,
            failures: Mutex::new(VecDeque::new()),
            held_fetch: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
        }
    }

    /// Fail the next mutation call with `error`
    pub fn fail_next(&self, error: TransportError) {
        self.failures.lock().push_back(error);
    }

    /// Hold the next fetch after it has read the inner document
    ///
    /// The held fetch returns what the store held when it was issued,
    /// which is what a slow response in flight looks like.
    pub fn hold_next_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.held_fetch.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<TransportError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.failures.lock().pop_front()
    }
}

#[async_trait]
impl<T: TreeTransport + ?Sized> TreeTransport for FlakyTransport<T> {
    async fn fetch_tree(&self, tree: &TreeId) -> Result<Branch, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.held_fetch.lock().take();
        let result = self.inner.fetch_tree(tree).await;
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn delete_nodes(
        &self,
        tree: &TreeId,
        ids: &BTreeSet<NodeId>,
    ) -> Result<(), TransportError> {
        match self.next_failure() {
            Some(err) => Err(err),
            None => self.inner.delete_nodes(tree, ids).await,
        }
    }

    async fn update_leaf(
        &self,
        tree: &TreeId,
        leaf: &NodeId,
        patch: &LeafPatch,
    ) -> Result<(), TransportError> {
        match self.next_failure() {
            Some(err) => Err(err),
            None => self.inner.update_leaf(tree, leaf, patch).await,
        }
    }
}
