//! FastHashMap: key/value map with stable entry indices over `FastHash`.

use crate::cursor::Cursor;
use crate::error::HashError;
use crate::fast_hash::{self, Entry, FastHash, IterMut};
use crate::probe::Probe;
use crate::traits::{IndexedMapOps, MapOps, MapSetCommon};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub struct FastHashMap<K, V, S = DefaultHashBuilder> {
    table: FastHash<K, V, S>,
}

impl<K, V> FastHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Map with room for `hint` entries before the dense storage grows.
    ///
    /// Panics when `hint` exceeds `MAX_ENTRIES`.
    pub fn with_capacity(hint: usize) -> Self {
        match Self::try_with_capacity_and_hasher(hint, Default::default()) {
            Ok(m) => m,
            Err(e) => crate::error::capacity_exhausted(e),
        }
    }
}

impl<K, V> Default for FastHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> FastHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: FastHash::with_hasher(hasher),
        }
    }

    pub fn try_with_capacity_and_hasher(hint: usize, hasher: S) -> Result<Self, HashError> {
        Ok(Self {
            table: FastHash::try_with_capacity_and_hasher(hint, hasher)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Size of the positions index (always a power of two).
    pub fn positions_len(&self) -> usize {
        self.table.positions_len()
    }

    /// One past the highest entry index handed out since the last `clear`.
    pub fn high_water(&self) -> usize {
        self.table.high_water()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn get_key_at(&self, index: usize) -> Option<&K> {
        self.table.entry_at(index).map(|(k, _)| k)
    }

    pub fn get_value_at(&self, index: usize) -> Option<&V> {
        self.table.entry_at(index).map(|(_, v)| v)
    }

    pub fn get_value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        self.table.value_at_mut(index)
    }

    /// Entries in dense order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Entries in dense order with their stable indices.
    pub fn iter_indexed(&self) -> impl ExactSizeIterator<Item = (usize, &K, &V)> + '_ {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.table.iter().map(|(_, k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.table.iter().map(|(_, _, v)| v)
    }

    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|(_, v)| v)
    }

    /// Scan keys in dense order, stopping at the first match.
    pub fn any_match<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        self.keys().any(|k| pred(k))
    }

    /// Scan keys in bucket order, stopping at the first match.
    pub fn any_match_random_order<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        self.table.iter_buckets().any(|(k, _)| pred(k))
    }

    /// Detached cursor over entry indices `0..high_water()`. Split it to
    /// walk disjoint index ranges independently.
    pub fn cursor(&self) -> Cursor<Self> {
        Cursor::new(self.len(), self.high_water())
    }
}

impl<K, V, S> FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find_position(q).is_some()
    }

    pub fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.index_of(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index_of(q).and_then(|i| self.get_value_at(i))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.index_of(q)?;
        self.table.value_at_mut(i)
    }

    pub fn get_or_default<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    /// Insert or overwrite, returning the entry index and whether `key` was
    /// newly added. Overwriting keeps the existing index.
    pub fn put_and_get_index(&mut self, key: K, value: V) -> (usize, bool) {
        self.table.grow_positions_if_needed();
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(pos) => {
                let index = self.table.index_at_position(pos);
                if let Some(v) = self.table.value_at_mut(index) {
                    *v = value;
                }
                (index, false)
            }
            Probe::Vacant(pos) => (self.table.insert_vacant(pos, hash, key, value), true),
        }
    }

    pub fn try_put(&mut self, key: K, value: V) -> bool {
        self.put_and_get_index(key, value).1
    }

    pub fn put(&mut self, key: K, value: V) {
        self.put_and_get_index(key, value);
    }

    pub fn compute_if_absent<F>(&mut self, key: K, supplier: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.table.grow_positions_if_needed();
        let hash = self.table.make_hash(&key);
        let index = match self.table.find(hash, &key) {
            Probe::Found(pos) => self.table.index_at_position(pos),
            Probe::Vacant(pos) => self.table.insert_vacant(pos, hash, key, supplier()),
        };
        self.live_value(index)
    }

    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(pos) => {
                let index = self.table.index_at_position(pos);
                match f(self.get_value_at(index)) {
                    Some(v) => {
                        if let Some(slot) = self.table.value_at_mut(index) {
                            *slot = v;
                        }
                        Some(self.live_value(index))
                    }
                    None => {
                        self.table.remove_at(pos);
                        None
                    }
                }
            }
            Probe::Vacant(_) => {
                let v = f(None)?;
                // Growing positions invalidates the vacant position, so probe
                // again afterwards.
                self.table.grow_positions_if_needed();
                let pos = match self.table.find(hash, &key) {
                    Probe::Vacant(pos) => pos,
                    Probe::Found(_) => unreachable!("key appeared during compute"),
                };
                let index = self.table.insert_vacant(pos, hash, key, v);
                Some(self.live_value(index))
            }
        }
    }

    /// Remove `q`, returning the entry index it occupied.
    pub fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|(i, _, _)| i)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|(_, _, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|(_, k, v)| (k, v))
    }

    pub fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).is_some()
    }

    /// Remove a key the caller knows to be present. Absent keys are ignored.
    pub fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if let Some(pos) = self.table.find_position(q) {
            self.table.remove_at(pos);
        }
    }

    fn live_value(&self, index: usize) -> &V {
        match self.table.entry_at(index) {
            Some((_, v)) => v,
            None => unreachable!("entry {} is vacant", index),
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_reachable(&self) {
        self.table.assert_reachable();
    }
}

impl<K, V, S> Cursor<FastHashMap<K, V, S>> {
    /// Next entry in dense order, failing if the map changed length since
    /// the cursor was created.
    pub fn next<'m>(
        &mut self,
        map: &'m FastHashMap<K, V, S>,
    ) -> Result<Option<(&'m K, &'m V)>, HashError> {
        self.next_indexed(map)
            .map(|found| found.map(|(_, key, value)| (key, value)))
    }

    /// Like `next`, with the entry index.
    pub fn next_indexed<'m>(
        &mut self,
        map: &'m FastHashMap<K, V, S>,
    ) -> Result<Option<(usize, &'m K, &'m V)>, HashError> {
        self.step(map.len(), map.table.entries(), |e| match e {
            Entry::Occupied { key, value, .. } => Some((key, value)),
            Entry::Vacant { .. } => None,
        })
        .map(|found| found.map(|(i, (key, value))| (i, key, value)))
    }
}

impl<'a, K, V, S> IntoIterator for &'a FastHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Entries of a `FastHashMap` in dense order.
pub struct Iter<'a, K, V> {
    inner: fast_hash::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for FastHashMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for FastHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> MapSetCommon<K> for FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        FastHashMap::len(self)
    }

    fn clear(&mut self) {
        FastHashMap::clear(self)
    }

    fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::contains_key(self, q)
    }

    fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::try_remove(self, q)
    }

    fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::remove_unchecked(self, q)
    }

    fn any_match<P>(&self, pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        FastHashMap::any_match(self, pred)
    }
}

impl<K, V, S> MapOps<K, V> for FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn try_put(&mut self, key: K, value: V) -> bool {
        FastHashMap::try_put(self, key, value)
    }

    fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::get(self, q)
    }

    fn compute_if_absent<F>(&mut self, key: K, supplier: F) -> &V
    where
        F: FnOnce() -> V,
    {
        FastHashMap::compute_if_absent(self, key, supplier)
    }

    fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        FastHashMap::compute(self, key, f)
    }
}

impl<K, V, S> IndexedMapOps<K, V> for FastHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put_and_get_index(&mut self, key: K, value: V) -> (usize, bool) {
        FastHashMap::put_and_get_index(self, key, value)
    }

    fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::remove_and_get_index(self, q)
    }

    fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashMap::index_of(self, q)
    }

    fn get_key_at(&self, index: usize) -> Option<&K> {
        FastHashMap::get_key_at(self, index)
    }

    fn get_value_at(&self, index: usize) -> Option<&V> {
        FastHashMap::get_value_at(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Collide, PassThrough};
    use std::cell::Cell;

    #[test]
    fn put_get_remove_scenario() {
        let mut m: FastHashMap<u32, u32> = FastHashMap::with_capacity(8);
        for k in 1..=10 {
            m.put(k, k * 10);
        }
        assert_eq!(m.get(&5), Some(&50));
        m.remove_unchecked(&5);
        assert!(!m.contains_key(&5));
        assert_eq!(m.get(&7), Some(&70));
        assert_eq!(m.len(), 9);
        m.assert_reachable();
    }

    #[test]
    fn overwrite_keeps_index() {
        let mut m: FastHashMap<&'static str, i32> = FastHashMap::new();
        assert_eq!(m.put_and_get_index("a", 1), (0, true));
        assert_eq!(m.put_and_get_index("b", 2), (1, true));
        assert_eq!(m.put_and_get_index("a", 3), (0, false));
        assert_eq!(m.get_value_at(0), Some(&3));
        assert_eq!(m.get_key_at(1), Some(&"b"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn index_accessors_see_vacant_entries_as_none() {
        let mut m: FastHashMap<String, u8> = FastHashMap::new();
        m.put("a".to_string(), 1);
        m.put("b".to_string(), 2);
        assert_eq!(m.remove_and_get_index("a"), Some(0));
        assert_eq!(m.get_key_at(0), None);
        assert_eq!(m.get_value_at(0), None);
        assert_eq!(m.get_key_at(1).map(String::as_str), Some("b"));
        assert_eq!(m.get_key_at(99), None);
        assert_eq!(m.remove_and_get_index("a"), None);
        assert_eq!(m.high_water(), 2);
    }

    #[test]
    fn compute_if_absent_runs_supplier_once() {
        let mut m: FastHashMap<u32, String> = FastHashMap::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let v = m.compute_if_absent(7, || {
                calls.set(calls.get() + 1);
                "seven".to_string()
            });
            assert_eq!(v, "seven");
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn compute_paths() {
        let mut m: FastHashMap<u32, u32> = FastHashMap::with_capacity(1);
        let calls = Cell::new(0);
        let bump = |cur: Option<&u32>| {
            calls.set(calls.get() + 1);
            Some(cur.copied().unwrap_or(0) + 1)
        };
        assert_eq!(m.compute(1, bump), Some(&1));
        assert_eq!(m.compute(1, bump), Some(&2));
        // Inserting through compute grows positions on the way.
        assert_eq!(m.compute(2, bump), Some(&1));
        assert_eq!(m.compute(3, bump), Some(&1));
        assert_eq!(calls.get(), 4);
        m.assert_reachable();

        assert_eq!(m.compute(2, |_| None), None);
        assert!(!m.contains_key(&2));
        assert_eq!(m.compute(9, |_| None), None);
        assert_eq!(m.len(), 2);
        m.assert_reachable();
    }

    #[test]
    fn any_match_in_both_orders() {
        let m: FastHashMap<u32, ()> = (0..32).map(|k| (k, ())).collect();
        assert!(m.any_match(|&k| k == 31));
        assert!(m.any_match_random_order(|&k| k == 31));
        assert!(!m.any_match(|&k| k == 32));
        assert!(!m.any_match_random_order(|&k| k == 32));

        let mut visited = 0;
        assert!(m.any_match_random_order(|_| {
            visited += 1;
            true
        }));
        assert_eq!(visited, 1);
    }

    #[test]
    fn cursor_detects_put_and_walks_dense_order() {
        let mut m: FastHashMap<u32, u32> = FastHashMap::new();
        for k in 0..4 {
            m.put(k, k);
        }
        m.remove_unchecked(&1);
        let mut c = m.cursor();
        let mut seen = Vec::new();
        while let Some((k, _)) = c.next(&m).unwrap() {
            seen.push(*k);
        }
        assert_eq!(seen, vec![0, 2, 3]);

        let mut c = m.cursor();
        m.put(10, 10);
        assert_eq!(
            c.next(&m),
            Err(HashError::ConcurrentModification {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn removing_everything_then_refilling_reuses_all_indices() {
        let mut m: FastHashMap<Collide, u32, PassThrough> = FastHashMap::with_hasher(PassThrough);
        for id in 0..10 {
            m.put(Collide::new(id as u64 % 3, id), id);
        }
        for id in 0..10 {
            assert!(m.try_remove(&Collide::new(id as u64 % 3, id)));
            m.assert_reachable();
        }
        assert!(m.is_empty());
        let mut indices: Vec<usize> = (0..10)
            .map(|id| m.put_and_get_index(Collide::new(id as u64, id), id).0)
            .collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert_eq!(m.high_water(), 10);
        m.assert_reachable();
    }
}
