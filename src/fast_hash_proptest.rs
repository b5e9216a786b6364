#![cfg(test)]

// Property tests for the dense-entry tables. The model tracks which entry
// index each key should own, so index stability and free-list reuse are
// checked alongside plain map semantics.

use crate::fast_hash_map::FastHashMap;
use crate::fast_hash_set::FastHashSet;
use crate::test_util::{Collide, PassThrough};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

fn arb_key() -> impl Strategy<Value = Collide> {
    (0u64..8, 0u32..4).prop_map(|(h, id)| Collide::new(h, id))
}

#[derive(Clone, Debug)]
enum Op {
    Put(Collide, u32),
    Remove(Collide),
    RemoveUnchecked(Collide),
    Get(Collide),
    GetAt(usize),
    Compute(Collide, Option<u32>),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (arb_key(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => arb_key().prop_map(Op::Remove),
        1 => arb_key().prop_map(Op::RemoveUnchecked),
        2 => arb_key().prop_map(Op::Get),
        2 => (0usize..40).prop_map(Op::GetAt),
        1 => (arb_key(), proptest::option::of(any::<u32>())).prop_map(|(k, v)| Op::Compute(k, v)),
        1 => Just(Op::Clear),
    ]
}

// Index model: live key -> (index, value), a LIFO stack of freed indices
// and the next never-used index.
#[derive(Default)]
struct Model {
    live: HashMap<Collide, (usize, u32)>,
    free: Vec<usize>,
    high_water: usize,
}

impl Model {
    fn put(&mut self, k: Collide, v: u32) -> (usize, bool) {
        if let Some(slot) = self.live.get_mut(&k) {
            slot.1 = v;
            return (slot.0, false);
        }
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.high_water += 1;
                self.high_water - 1
            }
        };
        self.live.insert(k, (index, v));
        (index, true)
    }

    fn remove(&mut self, k: &Collide) -> Option<(usize, u32)> {
        let out = self.live.remove(k)?;
        self.free.push(out.0);
        Some(out)
    }

    fn clear(&mut self) {
        *self = Model::default();
    }
}

// Property: FastHashMap matches the index model.
// - New keys take the most recently freed index, else the next fresh one.
// - Overwrites and unrelated removals never move a live entry's index.
// - Positions stay reachable and at most half full after each operation.
// - Dense iteration yields live entries in ascending index order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_map_matches_index_model(hint in 0usize..20, ops in proptest::collection::vec(arb_op(), 1..120)) {
        let mut sut: FastHashMap<Collide, u32, PassThrough> =
            FastHashMap::try_with_capacity_and_hasher(hint, PassThrough).unwrap();
        let minimum_positions = FastHashMap::<Collide, u32, PassThrough>::with_hasher(PassThrough).positions_len();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    prop_assert_eq!(sut.put_and_get_index(k, v), model.put(k, v));
                }
                Op::Remove(k) => {
                    let want = model.remove(&k);
                    prop_assert_eq!(sut.index_of(&k), want.map(|(i, _)| i));
                    prop_assert_eq!(sut.remove(&k), want.map(|(_, v)| v));
                }
                Op::RemoveUnchecked(k) => {
                    let want = model.remove(&k).map(|(i, _)| i);
                    sut.remove_unchecked(&k);
                    prop_assert_eq!(sut.get_key_at(want.unwrap_or(usize::MAX)), None);
                }
                Op::Get(k) => {
                    prop_assert_eq!(sut.get(&k), model.live.get(&k).map(|(_, v)| v));
                    prop_assert_eq!(sut.index_of(&k), model.live.get(&k).map(|(i, _)| *i));
                }
                Op::GetAt(i) => {
                    let want = model.live.iter().find(|(_, (idx, _))| *idx == i);
                    prop_assert_eq!(sut.get_key_at(i), want.map(|(k, _)| k));
                    prop_assert_eq!(sut.get_value_at(i), want.map(|(_, (_, v))| v));
                }
                Op::Compute(k, v) => {
                    let got = sut.compute(k, |old| v.map(|n| n.wrapping_add(old.copied().unwrap_or(1)))).copied();
                    let want = v.map(|n| n.wrapping_add(model.live.get(&k).map(|(_, x)| *x).unwrap_or(1)));
                    match want {
                        Some(n) => { model.put(k, n); }
                        None => { model.remove(&k); }
                    }
                    prop_assert_eq!(got, want);
                    prop_assert_eq!(sut.index_of(&k), model.live.get(&k).map(|(i, _)| *i));
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.positions_len(), minimum_positions);
                }
            }
            sut.assert_reachable();
            prop_assert_eq!(sut.len(), model.live.len());
            prop_assert_eq!(sut.high_water(), model.high_water);

            let dense: Vec<(usize, Collide, u32)> = sut.iter_indexed().map(|(i, k, v)| (i, *k, *v)).collect();
            let ordered: BTreeMap<usize, (Collide, u32)> =
                model.live.iter().map(|(k, (i, v))| (*i, (*k, *v))).collect();
            let want: Vec<(usize, Collide, u32)> = ordered.into_iter().map(|(i, (k, v))| (i, k, v)).collect();
            prop_assert_eq!(dense, want);
        }
    }
}

// Property: FastHashSet membership and bucket-order scans agree with
// std HashSet on colliding keys.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_set_matches_model(ops in proptest::collection::vec((any::<bool>(), arb_key()), 1..150)) {
        let mut sut: FastHashSet<Collide, PassThrough> = FastHashSet::with_hasher(PassThrough);
        let mut model: HashSet<Collide> = HashSet::new();
        for (add, k) in ops {
            if add {
                prop_assert_eq!(sut.try_add(k), model.insert(k));
            } else {
                prop_assert_eq!(sut.try_remove(&k), model.remove(&k));
            }
            sut.assert_reachable();
            prop_assert_eq!(sut.len(), model.len());
            for member in &model {
                prop_assert!(sut.any_match_random_order(|k| k == member));
            }
        }
        let seen: HashSet<Collide> = sut.iter().copied().collect();
        prop_assert_eq!(seen, model);
    }
}
