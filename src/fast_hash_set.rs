//! FastHashSet: key set with stable entry indices over `FastHash`.

use crate::cursor::Cursor;
use crate::error::HashError;
use crate::fast_hash::{self, Entry, FastHash};
use crate::probe::Probe;
use crate::traits::{IndexedSetOps, MapSetCommon, SetOps};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub struct FastHashSet<K, S = DefaultHashBuilder> {
    table: FastHash<K, (), S>,
}

impl<K> FastHashSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Panics when `hint` exceeds `MAX_ENTRIES`.
    pub fn with_capacity(hint: usize) -> Self {
        match Self::try_with_capacity_and_hasher(hint, Default::default()) {
            Ok(s) => s,
            Err(e) => crate::error::capacity_exhausted(e),
        }
    }
}

impl<K> Default for FastHashSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> FastHashSet<K, S> {
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

    pub fn positions_len(&self) -> usize {
        self.table.positions_len()
    }

    pub fn high_water(&self) -> usize {
        self.table.high_water()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn get_key_at(&self, index: usize) -> Option<&K> {
        self.table.entry_at(index).map(|(k, _)| k)
    }

    /// Keys in dense order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Keys in dense order with their stable indices.
    pub fn iter_indexed(&self) -> impl ExactSizeIterator<Item = (usize, &K)> + '_ {
        self.table.iter().map(|(i, k, _)| (i, k))
    }

    pub fn any_match<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        self.iter().any(|k| pred(k))
    }

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

impl<K, S> FastHashSet<K, S>
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

    /// Add `key`, returning its entry index and whether it was newly added.
    /// A present key keeps its index and the stored key.
    pub fn add_and_get_index(&mut self, key: K) -> (usize, bool) {
        self.table.grow_positions_if_needed();
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(pos) => (self.table.index_at_position(pos), false),
            Probe::Vacant(pos) => (self.table.insert_vacant(pos, hash, key, ()), true),
        }
    }

    pub fn try_add(&mut self, key: K) -> bool {
        self.add_and_get_index(key).1
    }

    pub fn add_unchecked(&mut self, key: K) {
        self.add_and_get_index(key);
    }

    pub fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|(i, _, _)| i)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|(_, k, _)| k)
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

    #[cfg(test)]
    pub(crate) fn assert_reachable(&self) {
        self.table.assert_reachable();
    }
}

impl<K, S> Cursor<FastHashSet<K, S>> {
    /// Next key in dense order with its entry index, failing if the set
    /// changed length since the cursor was created.
    pub fn next<'m>(
        &mut self,
        set: &'m FastHashSet<K, S>,
    ) -> Result<Option<(usize, &'m K)>, HashError> {
        self.step(set.len(), set.table.entries(), |e| match e {
            Entry::Occupied { key, .. } => Some(key),
            Entry::Vacant { .. } => None,
        })
    }
}

impl<'a, K, S> IntoIterator for &'a FastHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keys of a `FastHashSet` in dense order.
pub struct Iter<'a, K> {
    inner: fast_hash::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: Clone, S: Clone> Clone for FastHashSet<K, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for FastHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S> Extend<K> for FastHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.add_unchecked(k);
        }
    }
}

impl<K, S> FromIterator<K> for FastHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut s = Self::with_hasher(S::default());
        s.extend(iter);
        s
    }
}

impl<K, S> MapSetCommon<K> for FastHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        FastHashSet::len(self)
    }

    fn clear(&mut self) {
        FastHashSet::clear(self)
    }

    fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashSet::contains_key(self, q)
    }

    fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashSet::try_remove(self, q)
    }

    fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashSet::remove_unchecked(self, q)
    }

    fn any_match<P>(&self, pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        FastHashSet::any_match(self, pred)
    }
}

impl<K, S> SetOps<K> for FastHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn try_add(&mut self, key: K) -> bool {
        FastHashSet::try_add(self, key)
    }
}

impl<K, S> IndexedSetOps<K> for FastHashSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn add_and_get_index(&mut self, key: K) -> (usize, bool) {
        FastHashSet::add_and_get_index(self, key)
    }

    fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashSet::remove_and_get_index(self, q)
    }

    fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        FastHashSet::index_of(self, q)
    }

    fn get_key_at(&self, index: usize) -> Option<&K> {
        FastHashSet::get_key_at(self, index)
    }
}
