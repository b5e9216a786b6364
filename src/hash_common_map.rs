//! HashCommonMap: key/value map over the prime-sized `HashCommon` table.

use crate::cursor::Cursor;
use crate::error::HashError;
use crate::hash_common::{HashCommon, Iter, IterMut};
use crate::probe::Probe;
use crate::traits::{MapOps, MapSetCommon};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub struct HashCommonMap<K, V, S = DefaultHashBuilder> {
    table: HashCommon<K, V, S>,
}

impl<K, V> HashCommonMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Map sized for `hint` slots, rounded up to the next table prime.
    ///
    /// Panics when `hint` is beyond the largest supported capacity.
    pub fn with_capacity(hint: usize) -> Self {
        Self::with_capacity_and_hasher(hint, Default::default())
    }
}

impl<K, V> Default for HashCommonMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashCommonMap<K, V, S> {
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

    pub fn with_capacity_and_hasher(hint: usize, hasher: S) -> Self {
        match Self::try_with_capacity_and_hasher(hint, hasher) {
            Ok(m) => m,
            Err(e) => crate::error::capacity_exhausted(e),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.table.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.table.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl ExactSizeIterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|(_, v)| v)
    }

    pub fn any_match<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        self.keys().any(|k| pred(k))
    }

    /// Detached cursor over the entries; see `Cursor::next` below.
    pub fn cursor(&self) -> Cursor<Self> {
        Cursor::new(self.len(), self.capacity())
    }
}

impl<K, V, S> HashCommonMap<K, V, S>
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

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find_key(q).map(|i| &self.table.bucket(i).value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.table.find_key(q)?;
        Some(&mut self.table.bucket_mut(i).value)
    }

    pub fn get_or_default<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    /// Insert or overwrite. Returns true when `key` was not present.
    pub fn try_put(&mut self, key: K, value: V) -> bool {
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(i) => {
                self.table.bucket_mut(i).value = value;
                false
            }
            Probe::Vacant(i) => {
                self.table.insert_vacant(i, hash, key, value);
                true
            }
        }
    }

    pub fn put(&mut self, key: K, value: V) {
        self.try_put(key, value);
    }

    pub fn compute_if_absent<F>(&mut self, key: K, supplier: F) -> &V
    where
        F: FnOnce() -> V,
    {
        let hash = self.table.make_hash(&key);
        let index = match self.table.find(hash, &key) {
            Probe::Found(i) => i,
            Probe::Vacant(i) => self.table.insert_vacant(i, hash, key, supplier()),
        };
        &self.table.bucket(index).value
    }

    pub fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let hash = self.table.make_hash(&key);
        match self.table.find(hash, &key) {
            Probe::Found(i) => match f(Some(&self.table.bucket(i).value)) {
                Some(v) => {
                    self.table.bucket_mut(i).value = v;
                    Some(&self.table.bucket(i).value)
                }
                None => {
                    self.table.remove_at(i);
                    None
                }
            },
            Probe::Vacant(i) => {
                let v = f(None)?;
                let index = self.table.insert_vacant(i, hash, key, v);
                Some(&self.table.bucket(index).value)
            }
        }
    }

    /// Remove and return the value for `q`.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|b| b.value)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q).map(|b| (b.key, b.value))
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

impl<K, V, S> Cursor<HashCommonMap<K, V, S>> {
    /// Next entry in slot order, or `ConcurrentModification` when the map's
    /// length differs from the length it had when the cursor was created.
    pub fn next<'m>(
        &mut self,
        map: &'m HashCommonMap<K, V, S>,
    ) -> Result<Option<(&'m K, &'m V)>, HashError> {
        self.step(map.len(), map.table.slots(), |slot| {
            slot.as_ref().map(|b| (&b.key, &b.value))
        })
        .map(|found| found.map(|(_, entry)| entry))
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashCommonMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashCommonMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for HashCommonMap<K, V, S>
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

impl<K, V, S> FromIterator<(K, V)> for HashCommonMap<K, V, S>
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

impl<'a, K, V, S> IntoIterator for &'a HashCommonMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> MapSetCommon<K> for HashCommonMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        HashCommonMap::len(self)
    }

    fn clear(&mut self) {
        HashCommonMap::clear(self)
    }

    fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonMap::contains_key(self, q)
    }

    fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonMap::try_remove(self, q)
    }

    fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonMap::remove_unchecked(self, q)
    }

    fn any_match<P>(&self, pred: P) -> bool
    where
        P: FnMut(&K) -> bool,
    {
        HashCommonMap::any_match(self, pred)
    }
}

impl<K, V, S> MapOps<K, V> for HashCommonMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn try_put(&mut self, key: K, value: V) -> bool {
        HashCommonMap::try_put(self, key, value)
    }

    fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        HashCommonMap::get(self, q)
    }

    fn compute_if_absent<F>(&mut self, key: K, supplier: F) -> &V
    where
        F: FnOnce() -> V,
    {
        HashCommonMap::compute_if_absent(self, key, supplier)
    }

    fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        HashCommonMap::compute(self, key, f)
    }
}
