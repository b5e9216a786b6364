//! FastHash: dense entries plus a power-of-two positions index, shared by
//! `FastHashMap` and `FastHashSet`.
//!
//! Layout
//! - `entries` is append-mostly. An entry index never changes while the
//!   entry is live, so callers may keep indices as handles and read them
//!   back in O(1) without hashing.
//! - Removed entries turn `Vacant` and form a free list threaded through
//!   the vacant entries themselves; the next insertion reuses the most
//!   recently freed index. `entries.len()` is a high-water mark and never
//!   shrinks before `clear`.
//! - `positions` maps hash buckets to entry indices. It probes downward
//!   from `hash & (len - 1)` and is repaired with Algorithm R on removal.
//! - Growing `positions` redistributes by cached hash. Growing `entries`
//!   only moves memory: indices and hashes stay as they are.

use crate::error::{capacity_exhausted, HashError};
use crate::probe::{masked_slot, must_shift, prev_index, Probe};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroU32;
use hashbrown::hash_map::DefaultHashBuilder;

/// Entry capacity of a table created without a hint.
pub const MIN_ENTRIES: usize = 8;

/// Entry indices are stored as `u32` in the positions table.
pub const MAX_ENTRIES: usize = u32::MAX as usize;

/// Non-zero encoding of an entry index, so an empty position is `None`
/// without widening the cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct EntryRef(NonZeroU32);

impl EntryRef {
    #[inline]
    fn new(index: usize) -> Self {
        debug_assert!(index < MAX_ENTRIES);
        match NonZeroU32::new(index as u32 + 1) {
            Some(n) => EntryRef(n),
            None => unreachable!("entry index {} out of range", index),
        }
    }

    #[inline]
    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Entry<K, V> {
    Occupied { hash: u64, key: K, value: V },
    Vacant { next_free: Option<usize> },
}

type Positions = Box<[Option<EntryRef>]>;

fn empty_positions(len: usize) -> Positions {
    vec![None; len].into_boxed_slice()
}

fn positions_for(entries: usize) -> usize {
    (entries.max(1) * 2).next_power_of_two()
}

pub(crate) struct FastHash<K, V, S = DefaultHashBuilder> {
    hasher: S,
    positions: Positions,
    entries: Vec<Entry<K, V>>,
    free_head: Option<usize>,
    removed: usize,
}

impl<K, V, S> FastHash<K, V, S> {
    pub(crate) fn try_with_capacity_and_hasher(hint: usize, hasher: S) -> Result<Self, HashError> {
        if hint > MAX_ENTRIES {
            return Err(HashError::CapacityExceeded {
                requested: hint,
                max: MAX_ENTRIES,
            });
        }
        let entries = hint.max(1);
        Ok(Self {
            hasher,
            positions: empty_positions(positions_for(entries)),
            entries: Vec::with_capacity(entries),
            free_head: None,
            removed: 0,
        })
    }

    pub(crate) fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            positions: empty_positions(positions_for(MIN_ENTRIES)),
            entries: Vec::with_capacity(MIN_ENTRIES),
            free_head: None,
            removed: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.removed
    }

    pub(crate) fn positions_len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub(crate) fn entries_capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// One past the highest entry index handed out so far.
    pub(crate) fn high_water(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub(crate) fn entry_at(&self, index: usize) -> Option<(&K, &V)> {
        match self.entries.get(index) {
            Some(Entry::Occupied { key, value, .. }) => Some((key, value)),
            _ => None,
        }
    }

    pub(crate) fn value_at_mut(&mut self, index: usize) -> Option<&mut V> {
        match self.entries.get_mut(index) {
            Some(Entry::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn live_hash(&self, index: usize) -> u64 {
        match &self.entries[index] {
            Entry::Occupied { hash, .. } => *hash,
            Entry::Vacant { .. } => unreachable!("position refers to vacant entry {}", index),
        }
    }

    pub(crate) fn clear(&mut self) {
        log::trace!(
            "fast_hash: clear {} entries, positions {} -> {}",
            self.len(),
            self.positions.len(),
            positions_for(MIN_ENTRIES)
        );
        self.positions = empty_positions(positions_for(MIN_ENTRIES));
        self.entries = Vec::with_capacity(MIN_ENTRIES);
        self.free_head = None;
        self.removed = 0;
    }

    fn vacant_position_for(positions: &[Option<EntryRef>], hash: u64) -> usize {
        let capacity = positions.len();
        let mut index = masked_slot(hash, capacity);
        while positions[index].is_some() {
            index = prev_index(index, capacity);
        }
        index
    }

    /// Double `positions` when one more entry would fill more than half of
    /// it. Must run before probing for an insertion.
    pub(crate) fn grow_positions_if_needed(&mut self) {
        if (self.entries.len() + 1) * 2 <= self.positions.len() {
            return;
        }
        let new_len = self.positions.len() * 2;
        log::debug!(
            "fast_hash: grow positions {} -> {} ({} live, high water {})",
            self.positions.len(),
            new_len,
            self.len(),
            self.entries.len()
        );
        let old = core::mem::replace(&mut self.positions, empty_positions(new_len));
        for r in old.iter().flatten() {
            let index = Self::vacant_position_for(&self.positions, self.live_hash(r.index()));
            self.positions[index] = Some(*r);
        }
    }

    /// Index for a new entry: the most recently freed one, or a fresh one
    /// at the end of the dense storage.
    fn claim_entry(&mut self, hash: u64, key: K, value: V) -> Result<usize, HashError> {
        if let Some(index) = self.free_head {
            self.free_head = match &self.entries[index] {
                Entry::Vacant { next_free } => *next_free,
                Entry::Occupied { .. } => unreachable!("free list points at live entry {}", index),
            };
            self.removed -= 1;
            self.entries[index] = Entry::Occupied { hash, key, value };
            return Ok(index);
        }
        let index = self.entries.len();
        if index >= MAX_ENTRIES {
            return Err(HashError::CapacityExceeded {
                requested: index + 1,
                max: MAX_ENTRIES,
            });
        }
        if index == self.entries.capacity() {
            let extra = (index / 2).max(1).min(MAX_ENTRIES - index);
            log::debug!(
                "fast_hash: grow entries {} -> {}",
                index,
                index + extra
            );
            self.entries.reserve_exact(extra);
        }
        self.entries.push(Entry::Occupied { hash, key, value });
        Ok(index)
    }

    /// Store a new entry and point the vacant position `pos` at it. Returns
    /// the entry index.
    pub(crate) fn insert_vacant(&mut self, pos: usize, hash: u64, key: K, value: V) -> usize {
        debug_assert!(self.positions[pos].is_none());
        let index = match self.claim_entry(hash, key, value) {
            Ok(i) => i,
            Err(e) => capacity_exhausted(e),
        };
        self.positions[pos] = Some(EntryRef::new(index));
        index
    }

    /// Free the entry referenced from position `here`, push it on the free
    /// list and repair the positions chain. Returns the freed entry index
    /// and its contents.
    pub(crate) fn remove_at(&mut self, mut here: usize) -> (usize, K, V) {
        let index = match self.positions[here].take() {
            Some(r) => r.index(),
            None => unreachable!("position {} is empty", here),
        };
        let freed = core::mem::replace(
            &mut self.entries[index],
            Entry::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(index);
        self.removed += 1;

        let capacity = self.positions.len();
        let mut scan = here;
        loop {
            scan = prev_index(scan, capacity);
            let ideal = match self.positions[scan] {
                None => break,
                Some(r) => masked_slot(self.live_hash(r.index()), capacity),
            };
            if must_shift(here, scan, ideal, capacity) {
                self.positions[here] = self.positions[scan].take();
                here = scan;
            }
        }

        match freed {
            Entry::Occupied { key, value, .. } => (index, key, value),
            Entry::Vacant { .. } => unreachable!("position referred to vacant entry {}", index),
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            entries: self.entries.iter().enumerate(),
            remaining: self.len(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.len();
        IterMut {
            entries: self.entries.iter_mut(),
            remaining,
        }
    }

    /// Live entries in bucket order.
    pub(crate) fn iter_buckets(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.positions
            .iter()
            .flatten()
            .filter_map(move |r| self.entry_at(r.index()))
    }
}

impl<K, V, S> FastHash<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Probe `positions` for `q`; the returned index is a position, not an
    /// entry index.
    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let capacity = self.positions.len();
        let mut pos = masked_slot(hash, capacity);
        loop {
            let Some(r) = self.positions[pos] else {
                return Probe::Vacant(pos);
            };
            if let Entry::Occupied { hash: h, key, .. } = &self.entries[r.index()] {
                if *h == hash && key.borrow() == q {
                    return Probe::Found(pos);
                }
            }
            pos = prev_index(pos, capacity);
        }
    }

    pub(crate) fn find_position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(self.make_hash(q), q) {
            Probe::Found(pos) => Some(pos),
            Probe::Vacant(_) => None,
        }
    }

    /// Entry index of `q`.
    pub(crate) fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_position(q)
            .and_then(|pos| self.positions[pos])
            .map(EntryRef::index)
    }

    /// Entry index stored at a position reported by `find`.
    pub(crate) fn index_at_position(&self, pos: usize) -> usize {
        match self.positions[pos] {
            Some(r) => r.index(),
            None => unreachable!("position {} is empty", pos),
        }
    }

    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<(usize, K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_position(q).map(|pos| self.remove_at(pos))
    }

    /// Check reachability, the one-position-per-live-entry rule and the
    /// free list.
    #[cfg(test)]
    pub(crate) fn assert_reachable(&self) {
        let capacity = self.positions.len();
        let mut referenced = vec![false; self.entries.len()];
        for (pos, cell) in self.positions.iter().enumerate() {
            let Some(r) = cell else { continue };
            let index = r.index();
            assert!(!referenced[index], "entry {} referenced twice", index);
            referenced[index] = true;
            let Entry::Occupied { hash, key, .. } = &self.entries[index] else {
                panic!("position {} refers to vacant entry {}", pos, index);
            };
            assert_eq!(*hash, self.make_hash(key), "stale hash for entry {}", index);
            let mut j = masked_slot(*hash, capacity);
            while j != pos {
                assert!(self.positions[j].is_some(), "position {} unreachable: hole at {}", pos, j);
                j = prev_index(j, capacity);
            }
        }
        let mut free = 0;
        let mut next = self.free_head;
        while let Some(i) = next {
            free += 1;
            assert!(free <= self.entries.len(), "free list cycles");
            match &self.entries[i] {
                Entry::Vacant { next_free } => next = *next_free,
                Entry::Occupied { .. } => panic!("free list reaches live entry {}", i),
            }
        }
        assert_eq!(free, self.removed, "free list length differs from removed count");
        for (i, e) in self.entries.iter().enumerate() {
            let live = matches!(e, Entry::Occupied { .. });
            assert_eq!(live, referenced[i], "entry {} live={} but referenced={}", i, live, referenced[i]);
        }
        assert!(self.entries.len() * 2 <= capacity, "positions overloaded");
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for FastHash<K, V, S> {
    fn clone(&self) -> Self {
        // Entry indices are handles, so the clone keeps the same layout.
        Self {
            hasher: self.hasher.clone(),
            positions: self.positions.clone(),
            entries: self.entries.clone(),
            free_head: self.free_head,
            removed: self.removed,
        }
    }
}

/// Iterator over live entries in dense (entry index) order.
pub struct Iter<'a, K, V> {
    entries: core::iter::Enumerate<core::slice::Iter<'a, Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (usize, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for (i, e) in self.entries.by_ref() {
            if let Entry::Occupied { key, value, .. } = e {
                self.remaining -= 1;
                return Some((i, key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over live entries with mutable values.
pub struct IterMut<'a, K, V> {
    entries: core::slice::IterMut<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for e in self.entries.by_ref() {
            if let Entry::Occupied { key, value, .. } = e {
                self.remaining -= 1;
                return Some((&*key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{Collide, PassThrough};

    type Table = FastHash<Collide, u32, PassThrough>;

    fn put(t: &mut Table, k: Collide, v: u32) -> usize {
        t.grow_positions_if_needed();
        let hash = t.make_hash(&k);
        match t.find(hash, &k) {
            Probe::Found(pos) => {
                let i = t.index_at_position(pos);
                *t.value_at_mut(i).unwrap() = v;
                i
            }
            Probe::Vacant(pos) => t.insert_vacant(pos, hash, k, v),
        }
    }

    #[test]
    fn entry_ref_is_never_zero() {
        assert_eq!(EntryRef::new(0).index(), 0);
        assert_eq!(EntryRef::new(41).index(), 41);
        assert_eq!(core::mem::size_of::<Option<EntryRef>>(), 4);
    }

    #[test]
    fn default_sizes() {
        let t = Table::with_hasher(PassThrough);
        assert_eq!(t.positions_len(), 16);
        assert!(t.entries_capacity() >= MIN_ENTRIES);
        let t = Table::try_with_capacity_and_hasher(5, PassThrough).unwrap();
        assert_eq!(t.positions_len(), 16);
        let t = Table::try_with_capacity_and_hasher(0, PassThrough).unwrap();
        assert_eq!(t.positions_len(), 2);
    }

    #[test]
    fn positions_stay_at_most_half_full() {
        let mut t = Table::try_with_capacity_and_hasher(1, PassThrough).unwrap();
        for id in 0..40 {
            put(&mut t, Collide::new(id as u64 * 7, id), id);
            t.assert_reachable();
        }
        assert_eq!(t.len(), 40);
        assert_eq!(t.positions_len(), 128);
        // Misses terminate: there is always an empty position.
        assert!(t.find_position(&Collide::new(3, 999)).is_none());
    }

    #[test]
    fn entries_grow_without_renumbering() {
        let mut t = Table::try_with_capacity_and_hasher(2, PassThrough).unwrap();
        let idx: Vec<usize> = (0..20).map(|id| put(&mut t, Collide::new(id as u64, id), id)).collect();
        assert_eq!(idx, (0..20).collect::<Vec<_>>());
        for id in 0..20u32 {
            assert_eq!(t.entry_at(id as usize).map(|(k, _)| k.id), Some(id));
        }
    }

    #[test]
    fn freed_indices_are_reused_most_recent_first() {
        let mut t = Table::with_hasher(PassThrough);
        for id in 0..5 {
            put(&mut t, Collide::new(id as u64, id), id);
        }
        let (i1, _, _) = t.remove(&Collide::new(1, 1)).unwrap();
        let (i3, _, _) = t.remove(&Collide::new(3, 3)).unwrap();
        assert_eq!((i1, i3), (1, 3));
        assert_eq!(t.len(), 3);
        assert_eq!(t.high_water(), 5);
        t.assert_reachable();

        assert_eq!(put(&mut t, Collide::new(10, 10), 10), 3);
        assert_eq!(put(&mut t, Collide::new(11, 11), 11), 1);
        assert_eq!(put(&mut t, Collide::new(12, 12), 12), 5);
        t.assert_reachable();
    }

    // Colliding keys in the lowest positions wrap to the top of the
    // positions array; removing the first probed one pulls the rest back.
    #[test]
    fn removal_repairs_wrapping_cluster() {
        let mut t = Table::try_with_capacity_and_hasher(16, PassThrough).unwrap();
        assert_eq!(t.positions_len(), 32);
        for id in 0..5 {
            put(&mut t, Collide::new(1, id), id);
        }
        put(&mut t, Collide::new(0, 10), 10);
        put(&mut t, Collide::new(31, 20), 20);
        t.assert_reachable();

        let (index, key, value) = t.remove(&Collide::new(1, 0)).unwrap();
        assert_eq!((index, key.id, value), (0, 0, 0));
        t.assert_reachable();
        for id in 1..5 {
            assert!(t.index_of(&Collide::new(1, id)).is_some());
        }
        assert_eq!(t.index_of(&Collide::new(0, 10)), Some(5));
        assert_eq!(t.index_of(&Collide::new(31, 20)), Some(6));
    }

    #[test]
    fn bucket_order_visits_every_live_entry() {
        let mut t = Table::with_hasher(PassThrough);
        for id in 0..6 {
            put(&mut t, Collide::new(5 - id as u64, id), id);
        }
        t.remove(&Collide::new(5, 0));
        let mut ids: Vec<u32> = t.iter_buckets().map(|(k, _)| k.id).collect();
        // Bucket order follows hash, not insertion.
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        ids.sort_unstable();
        let dense: Vec<u32> = t.iter().map(|(_, k, _)| k.id).collect();
        assert_eq!(ids, dense);
    }

    #[test]
    fn clear_drops_to_minimum_sizes() {
        let mut t = Table::try_with_capacity_and_hasher(1000, PassThrough).unwrap();
        assert_eq!(t.positions_len(), 2048);
        for id in 0..5000 {
            put(&mut t, Collide::new(id as u64, id), id);
        }
        t.remove(&Collide::new(3, 3));
        t.clear();
        assert_eq!(t.len(), 0);
        assert_eq!(t.high_water(), 0);
        assert_eq!(t.positions_len(), positions_for(MIN_ENTRIES));
        assert_eq!(t.positions_len(), Table::with_hasher(PassThrough).positions_len());
        assert!(t.entries_capacity() < 1000);
        assert_eq!(put(&mut t, Collide::new(7, 7), 7), 0);
        t.assert_reachable();
    }

    #[test]
    fn oversized_hint_is_rejected() {
        assert!(matches!(
            Table::try_with_capacity_and_hasher(MAX_ENTRIES + 1, PassThrough),
            Err(HashError::CapacityExceeded { .. })
        ));
    }
}
