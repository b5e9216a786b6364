#![cfg(test)]

// Property tests for the prime-sized tables kept inside the crate so they
// can check slot-level reachability after every operation.

use crate::hash_common_map::HashCommonMap;
use crate::hash_common_set::HashCommonSet;
use crate::primes::MIN_CAPACITY;
use crate::test_util::{Collide, PassThrough};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

// A narrow hash space keeps clusters long and forces wraparound; the id
// keeps colliding keys distinct.
fn arb_key() -> impl Strategy<Value = Collide> {
    (0u64..6, 0u32..5).prop_map(|(h, id)| Collide::new(h, id))
}

#[derive(Clone, Debug)]
enum Op {
    Put(Collide, u32),
    TryPut(Collide, u32),
    Remove(Collide),
    RemoveUnchecked(Collide),
    Get(Collide),
    ComputeIfAbsent(Collide, u32),
    Compute(Collide, Option<u32>),
    Clear,
    Iterate,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_key(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => (arb_key(), any::<u32>()).prop_map(|(k, v)| Op::TryPut(k, v)),
        3 => arb_key().prop_map(Op::Remove),
        2 => arb_key().prop_map(Op::RemoveUnchecked),
        2 => arb_key().prop_map(Op::Get),
        1 => (arb_key(), any::<u32>()).prop_map(|(k, v)| Op::ComputeIfAbsent(k, v)),
        1 => (arb_key(), proptest::option::of(any::<u32>())).prop_map(|(k, v)| Op::Compute(k, v)),
        1 => Just(Op::Clear),
        1 => Just(Op::Iterate),
    ]
}

// Property: HashCommonMap behaves like std HashMap.
// - put/try_put/compute report presence the same way the model does.
// - Removal through any path keeps every remaining key reachable from its
//   ideal slot (no tombstones, no holes inside clusters).
// - Occupancy never exceeds half the capacity after an operation.
// - clear() drops back to the minimum capacity.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_map_matches_model(hint in 0usize..40, ops in proptest::collection::vec(arb_op(), 1..120)) {
        let mut sut: HashCommonMap<Collide, u32, PassThrough> =
            HashCommonMap::try_with_capacity_and_hasher(hint, PassThrough).unwrap();
        let mut model: HashMap<Collide, u32> = HashMap::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    sut.put(k, v);
                    model.insert(k, v);
                }
                Op::TryPut(k, v) => {
                    let added = sut.try_put(k, v);
                    prop_assert_eq!(added, model.insert(k, v).is_none());
                }
                Op::Remove(k) => {
                    prop_assert_eq!(sut.remove(&k), model.remove(&k));
                }
                Op::RemoveUnchecked(k) => {
                    sut.remove_unchecked(&k);
                    model.remove(&k);
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
                Op::ComputeIfAbsent(k, v) => {
                    let got = *sut.compute_if_absent(k, || v);
                    prop_assert_eq!(got, *model.entry(k).or_insert(v));
                }
                Op::Compute(k, v) => {
                    let got = sut.compute(k, |old| v.map(|n| n ^ old.copied().unwrap_or(0))).copied();
                    let want = v.map(|n| n ^ model.get(&k).copied().unwrap_or(0));
                    match want {
                        Some(n) => { model.insert(k, n); }
                        None => { model.remove(&k); }
                    }
                    prop_assert_eq!(got, want);
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.capacity(), MIN_CAPACITY);
                }
                Op::Iterate => {
                    let seen: HashMap<Collide, u32> = sut.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(&seen, &model);
                }
            }
            sut.assert_reachable();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.iter().count(), model.len());
            prop_assert!(sut.len() * 2 <= sut.capacity());
        }
    }
}

// Property: HashCommonSet membership matches std HashSet under adds and
// removals on colliding keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_set_matches_model(ops in proptest::collection::vec((any::<bool>(), arb_key()), 1..150)) {
        let mut sut: HashCommonSet<Collide, PassThrough> = HashCommonSet::with_hasher(PassThrough);
        let mut model: HashSet<Collide> = HashSet::new();
        for (add, k) in ops {
            if add {
                prop_assert_eq!(sut.try_add(k), model.insert(k));
            } else {
                prop_assert_eq!(sut.take(&k), model.take(&k));
            }
            sut.assert_reachable();
            prop_assert_eq!(sut.len(), model.len());
        }
        let seen: HashSet<Collide> = sut.iter().copied().collect();
        prop_assert_eq!(seen, model);
    }
}
