// Shared-trait tests: the same generic driver runs against both table
// families, so map and set semantics cannot drift apart.
use graph_hash::{
    FastHashMap, FastHashSet, HashCommonMap, HashCommonSet, IndexedMapOps, IndexedSetOps, MapOps,
    MapSetCommon, SetOps,
};

fn exercise_map<M: MapOps<u32, String> + Default>() {
    let mut m = M::default();
    assert!(m.is_empty());
    for k in 0..100 {
        assert!(m.try_put(k, k.to_string()));
    }
    m.put(7, "seven".to_string());
    assert_eq!(m.len(), 100);
    assert_eq!(m.get(&7).map(String::as_str), Some("seven"));
    assert_eq!(m.get_or_default(&1000, &"none".to_string()), "none");

    assert!(m.try_remove(&7));
    assert!(!m.try_remove(&7));
    m.remove_unchecked(&7);
    assert_eq!(m.len(), 99);
    assert!(!m.contains_key(&7));
    assert!(m.any_match(|k| *k == 99));

    assert_eq!(m.compute_if_absent(7, || "back".to_string()), "back");
    assert_eq!(
        m.compute(7, |old| old.map(|s| s.to_uppercase())).map(String::as_str),
        Some("BACK")
    );
    assert_eq!(m.compute(7, |_| None), None);
    assert_eq!(m.len(), 99);

    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.get(&1), None);
}

fn exercise_set<T: SetOps<u64> + Default>() {
    let mut s = T::default();
    for k in 0..64u64 {
        s.add_unchecked(k * k);
    }
    assert!(!s.try_add(49));
    assert_eq!(s.len(), 64);
    for k in 0..64u64 {
        assert!(s.contains_key(&(k * k)));
    }
    assert!(!s.contains_key(&2));
    for k in (0..64u64).step_by(3) {
        assert!(s.try_remove(&(k * k)));
    }
    assert_eq!(s.len(), 64 - 22);
    assert!(!s.any_match(|k| *k == 9));
}

#[test]
fn map_ops_common() {
    exercise_map::<HashCommonMap<u32, String>>();
}

#[test]
fn map_ops_fast() {
    exercise_map::<FastHashMap<u32, String>>();
}

#[test]
fn set_ops_common() {
    exercise_set::<HashCommonSet<u64>>();
}

#[test]
fn set_ops_fast() {
    exercise_set::<FastHashSet<u64>>();
}

fn reuse_indices_set<T: IndexedSetOps<&'static str> + Default>() {
    let mut s = T::default();
    assert_eq!(s.add_and_get_index("x"), (0, true));
    assert_eq!(s.add_and_get_index("y"), (1, true));
    assert_eq!(s.remove_and_get_index("x"), Some(0));
    assert_eq!(s.add_and_get_index("z"), (0, true));
    assert_eq!(s.get_key_at(1), Some(&"y"));
    assert_eq!(s.index_of("z"), Some(0));
}

fn reuse_indices_map<M: IndexedMapOps<&'static str, u8> + Default>() {
    let mut m = M::default();
    assert_eq!(m.put_and_get_index("x", 1), (0, true));
    assert_eq!(m.put_and_get_index("y", 2), (1, true));
    assert_eq!(m.put_and_get_index("y", 3), (1, false));
    assert_eq!(m.remove_and_get_index("x"), Some(0));
    assert_eq!(m.put_and_get_index("z", 4), (0, true));
    assert_eq!(m.get_key_at(1), Some(&"y"));
    assert_eq!(m.get_value_at(1), Some(&3));
    assert_eq!(m.index_of("z"), Some(0));
}

#[test]
fn indexed_ops() {
    reuse_indices_set::<FastHashSet<&'static str>>();
    reuse_indices_map::<FastHashMap<&'static str, u8>>();
}
