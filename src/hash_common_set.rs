//! HashCommonSet: key set over the prime-sized `HashCommon` table.

use crate::cursor::Cursor;
use crate::error::HashError;
use crate::hash_common::{self, HashCommon};
use crate::probe::Probe;
use crate::traits::{MapSetCommon, SetOps};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub struct HashCommonSet<K, S = DefaultHashBuilder> {
    table: HashCommon<K, (), S>,
}

impl<K> HashCommonSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Panics when `hint` is beyond the largest supported capacity.
    pub fn with_capacity(hint: usize) -> Self {
        match Self::try_with_capacity_and_hasher(hint, Default::default()) {
            Ok(s) => s,
            Err(e) => crate::error::capacity_exhausted(e),
        }
    }
}

impl<K> Default for HashCommonSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> HashCommonSet<K, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: HashCommon::with_hasher(hasher),
        }
    }

    pub fn try_with_capacity_and_hasher(hint: usize, hasher: S) -> Result<Self, HashError> {
        Ok(Self {
            table: HashCommon::try_with_capacity_and_hasher(hint, hasher)?,
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn any_match<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        self.iter().any(|k| pred(k))
    }

    /// Detached cursor over every slot.
    pub fn cursor(&self) -> Cursor<Self> {
        Cursor::new(self.len(), self.capacity())
    }
}

impl<K, S> HashCommonSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find_key(q).is_some()
    }

    /// Add `key`; false when it was already present (the stored key is kept).
    pub fn try_add(&mut self, key: K) -> bool {
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(_) => false,
            Probe::Vacant(i) => {
                self.table.insert_vacant(i, hash, key, ());
                true
            }
        }
    }

    pub fn add_unchecked(&mut self, key: K) {
        self.try_add(key);
    }

    /// Remove and return the stored key equal to `q`.
    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|b| b.key)
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
        if let Some(i) = self.table.find_key(q) {
            self.table.remove_at(i);
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_reachable(&self) {
        self.table.assert_reachable();
    }
}

impl<K, S> Cursor<HashCommonSet<K, S>> {
    /// Next key in slot order, failing if the set changed length.
    pub fn next<'m>(&mut self, set: &'m HashCommonSet<K, S>) -> Result<Option<&'m K>, HashError> {
        self.step(set.len(), set.table.slots(), |slot| {
            slot.as_ref().map(|b| &b.key)
        })
        .map(|found| found.map(|(_, key)| key))
    }
}

impl<'a, K, S> IntoIterator for &'a HashCommonSet<K, S> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keys of a `HashCommonSet` in slot order.
pub struct Iter<'a, K> {
    inner: hash_common::Iter<'a, K, ()>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
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

impl<K: Clone, S: Clone> Clone for HashCommonSet<K, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for HashCommonSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S> Extend<K> for HashCommonSet<K, S>
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

impl<K, S> FromIterator<K> for HashCommonSet<K, S>
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

impl<K, S> MapSetCommon<K> for HashCommonSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        HashCommonSet::len(self)
    }

    fn clear(&mut self) {
        HashCommonSet::clear(self)
    }

    fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonSet::contains_key(self, q)
    }

    fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonSet::try_remove(self, q)
    }

    fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonSet::remove_unchecked(self, q)
    }

    fn any_match<P>(&self, pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        HashCommonSet::any_match(self, pred)
    }
}

impl<K, S> SetOps<K> for HashCommonSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn try_add(&mut self, key: K) -> bool {
        HashCommonSet::try_add(self, key)
    }
}
