//! Map/set contract shared by both table families.
//!
//! Collaborators such as triple stores are written against these traits so
//! they can switch between the common and the fast tables.

use core::borrow::Borrow;
use core::hash::Hash;

/// Operations every map and set supports.
pub trait MapSetCommon<K> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything and drop back to the minimum capacity.
    fn clear(&mut self);

    fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Remove `q`; returns whether it was present.
    fn try_remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Remove `q`, which the caller knows is present. Absent keys are
    /// silently ignored.
    fn remove_unchecked<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// True when any key satisfies `pred`; stops at the first match.
    fn any_match<P>(&self, pred: P) -> bool
    where
        P: FnMut(&K) -> bool;
}

pub trait SetOps<K>: MapSetCommon<K> {
    /// Add `key`; returns false when it was already present.
    fn try_add(&mut self, key: K) -> bool;

    fn add_unchecked(&mut self, key: K) {
        self.try_add(key);
    }
}

pub trait MapOps<K, V>: MapSetCommon<K> {
    /// Insert or overwrite; returns true when `key` was not present before.
    fn try_put(&mut self, key: K, value: V) -> bool;

    fn put(&mut self, key: K, value: V) {
        self.try_put(key, value);
    }

    fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn get_or_default<'a, Q>(&'a self, q: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).unwrap_or(default)
    }

    /// Value for `key`, inserting `supplier()` first when absent. The
    /// supplier runs at most once.
    fn compute_if_absent<F>(&mut self, key: K, supplier: F) -> &V
    where
        F: FnOnce() -> V;

    /// Replace the value for `key` with `f(current)`. `None` from `f`
    /// removes the entry (or leaves it absent). `f` runs exactly once.
    fn compute<F>(&mut self, key: K, f: F) -> Option<&V>
    where
        F: FnOnce(Option<&V>) -> Option<V>;
}

/// Sets whose entries live at stable dense indices.
pub trait IndexedSetOps<K>: SetOps<K> {
    /// Add `key`, returning its entry index and whether it was newly added.
    fn add_and_get_index(&mut self, key: K) -> (usize, bool);

    /// Remove `q`, returning the entry index it occupied.
    fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn get_key_at(&self, index: usize) -> Option<&K>;
}

/// Maps whose entries live at stable dense indices.
pub trait IndexedMapOps<K, V>: MapOps<K, V> {
    /// Insert or overwrite, returning the entry index and whether `key` was
    /// newly added.
    fn put_and_get_index(&mut self, key: K, value: V) -> (usize, bool);

    fn remove_and_get_index<Q>(&mut self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn get_key_at(&self, index: usize) -> Option<&K>;

    fn get_value_at(&self, index: usize) -> Option<&V>;
}
