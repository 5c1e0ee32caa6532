use proptest::prelude::*;
use std::collections::BTreeSet;
use tagtree_engine::{remove_nodes, strip_counts, TreeMutation};
use tagtree_model::{Branch, NodeId, TreeId};
use tagtree_sync::{MutationId, TreeCache};
use tagtree_test_utils::arb_tree_with_picks;

/// Tree, picked ids, which picks fail, and the order failures resolve in
fn arb_schedule() -> impl Strategy<Value = (Branch, Vec<NodeId>, Vec<bool>, Vec<usize>)> {
    arb_tree_with_picks().prop_flat_map(|(tree, picks)| {
        let n = picks.len();
        (
            Just(tree),
            Just(picks),
            proptest::collection::vec(any::<bool>(), n),
            Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

proptest! {
    #[test]
    fn prop_rollbacks_in_any_order_keep_survivors(
        (tree, picks, fails, order) in arb_schedule()
    ) {
        let cache = TreeCache::default();
        let tid = TreeId::from(&tree.id);
        cache.prime(tid.clone(), tree.clone());

        for (i, pick) in picks.iter().enumerate() {
            let id = MutationId::new(i as u64);
            cache.begin(&tid, id, &TreeMutation::delete_one(pick.clone())).unwrap();
        }
        for &i in &order {
            let id = MutationId::new(i as u64);
            if fails[i] {
                cache.rollback(&tid, id);
            } else {
                cache.commit(&tid, id);
            }
        }

        let survivors: BTreeSet<NodeId> = picks
            .iter()
            .zip(&fails)
            .filter(|(_, failed)| !**failed)
            .map(|(pick, _)| pick.clone())
            .collect();
        let expected = remove_nodes(&tree, &survivors).unwrap();
        prop_assert_eq!(strip_counts(&cache.get(&tid).unwrap()), expected);
    }

    #[test]
    fn prop_generation_strictly_increases(
        (tree, picks, fails, order) in arb_schedule()
    ) {
        let cache = TreeCache::default();
        let tid = TreeId::from(&tree.id);
        cache.prime(tid.clone(), tree);
        let mut last = cache.generation(&tid);

        for (i, pick) in picks.iter().enumerate() {
            cache.begin(&tid, MutationId::new(i as u64), &TreeMutation::delete_one(pick.clone())).unwrap();
            prop_assert!(cache.generation(&tid) > last);
            last = cache.generation(&tid);
        }
        for &i in &order {
            if fails[i] {
                cache.rollback(&tid, MutationId::new(i as u64));
                prop_assert!(cache.generation(&tid) > last);
                last = cache.generation(&tid);
            }
        }
    }
}
