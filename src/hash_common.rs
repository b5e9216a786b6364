//! HashCommon: prime-sized linear-probing table shared by `HashCommonMap`
//! and `HashCommonSet`.
//!
//! Layout
//! - One slot array; `None` marks an empty slot. Occupied slots keep the
//!   key, the value (unit for sets) and the key's hash, computed once on
//!   insertion and reused by growth and removal.
//! - Capacity is always one of `primes::PRIMES`; the table grows into the
//!   next prime once more than half of the slots are taken.
//! - Probing walks downward with wraparound from the ideal slot.
//! - Removal repairs the probe chain in place (Algorithm R); there are no
//!   tombstones.

use crate::error::{capacity_exhausted, HashError};
use crate::primes;
use crate::probe::{must_shift, prev_index, prime_slot, Probe};
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
}

type Slots<K, V> = Box<[Option<Bucket<K, V>>]>;

pub(crate) struct HashCommon<K, V, S = DefaultHashBuilder> {
    hasher: S,
    slots: Slots<K, V>,
    len: usize,
    threshold: usize,
}

fn empty_slots<K, V>(capacity: usize) -> Slots<K, V> {
    (0..capacity).map(|_| None).collect()
}

fn threshold_for(capacity: usize) -> usize {
    capacity / 2
}

impl<K, V, S> HashCommon<K, V, S> {
    pub(crate) fn try_with_capacity_and_hasher(hint: usize, hasher: S) -> Result<Self, HashError> {
        let capacity = primes::capacity_at_least(hint)?;
        Ok(Self {
            hasher,
            slots: empty_slots(capacity),
            len: 0,
            threshold: threshold_for(capacity),
        })
    }

    pub(crate) fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            slots: empty_slots(primes::MIN_CAPACITY),
            len: 0,
            threshold: threshold_for(primes::MIN_CAPACITY),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn slots(&self) -> &[Option<Bucket<K, V>>] {
        &self.slots
    }

    pub(crate) fn bucket(&self, index: usize) -> &Bucket<K, V> {
        match &self.slots[index] {
            Some(b) => b,
            None => unreachable!("slot {} is empty", index),
        }
    }

    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut Bucket<K, V> {
        match &mut self.slots[index] {
            Some(b) => b,
            None => unreachable!("slot {} is empty", index),
        }
    }

    pub(crate) fn clear(&mut self) {
        log::trace!(
            "hash_common: clear {} entries, capacity {} -> {}",
            self.len,
            self.slots.len(),
            primes::MIN_CAPACITY
        );
        self.slots = empty_slots(primes::MIN_CAPACITY);
        self.len = 0;
        self.threshold = threshold_for(primes::MIN_CAPACITY);
    }

    fn vacant_slot_for(slots: &[Option<Bucket<K, V>>], hash: u64) -> usize {
        let capacity = slots.len();
        let mut index = prime_slot(hash, capacity);
        while slots[index].is_some() {
            index = prev_index(index, capacity);
        }
        index
    }

    /// Rehash every bucket into the next prime capacity.
    fn grow(&mut self) -> Result<(), HashError> {
        let new_capacity = primes::grown_capacity(self.slots.len())?;
        log::debug!(
            "hash_common: grow {} -> {} slots ({} live)",
            self.slots.len(),
            new_capacity,
            self.len
        );
        let old = core::mem::replace(&mut self.slots, empty_slots(new_capacity));
        for bucket in Vec::from(old).into_iter().flatten() {
            let index = Self::vacant_slot_for(&self.slots, bucket.hash);
            self.slots[index] = Some(bucket);
        }
        self.threshold = threshold_for(new_capacity);
        Ok(())
    }

    /// Store a new bucket at `index`, which a probe reported vacant, growing
    /// first when the insertion would overload the table. Returns the slot
    /// the bucket ended up in.
    pub(crate) fn insert_vacant(&mut self, index: usize, hash: u64, key: K, value: V) -> usize {
        let index = if self.len + 1 > self.threshold {
            if let Err(e) = self.grow() {
                capacity_exhausted(e);
            }
            Self::vacant_slot_for(&self.slots, hash)
        } else {
            index
        };
        debug_assert!(self.slots[index].is_none());
        self.slots[index] = Some(Bucket { hash, key, value });
        self.len += 1;
        index
    }

    /// Remove the bucket at `here` and repair the probe chains running
    /// through it.
    pub(crate) fn remove_at(&mut self, mut here: usize) -> Bucket<K, V> {
        let removed = match self.slots[here].take() {
            Some(b) => b,
            None => unreachable!("slot {} is empty", here),
        };
        self.len -= 1;
        let capacity = self.slots.len();
        let mut scan = here;
        loop {
            scan = prev_index(scan, capacity);
            let ideal = match &self.slots[scan] {
                None => break,
                Some(b) => prime_slot(b.hash, capacity),
            };
            if must_shift(here, scan, ideal, capacity) {
                self.slots[here] = self.slots[scan].take();
                here = scan;
            }
        }
        removed
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }
}

impl<K, V, S> HashCommon<K, V, S>
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

    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let capacity = self.slots.len();
        let mut index = prime_slot(hash, capacity);
        loop {
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(b) if b.hash == hash && b.key.borrow() == q => return Probe::Found(index),
                Some(_) => index = prev_index(index, capacity),
            }
        }
    }

    pub(crate) fn find_key<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(self.make_hash(q), q) {
            Probe::Found(i) => Some(i),
            Probe::Vacant(_) => None,
        }
    }

    /// Remove `q` if present.
    pub(crate) fn remove<Q>(&mut self, q: &Q) -> Option<Bucket<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_key(q).map(|i| self.remove_at(i))
    }

    /// Check the reachability invariant for every occupied slot.
    #[cfg(test)]
    pub(crate) fn assert_reachable(&self) {
        let capacity = self.slots.len();
        let mut live = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(b) = slot else { continue };
            live += 1;
            assert_eq!(b.hash, self.make_hash(&b.key), "stale hash at slot {}", i);
            let mut j = prime_slot(b.hash, capacity);
            while j != i {
                assert!(self.slots[j].is_some(), "slot {} unreachable: hole at {}", i, j);
                j = prev_index(j, capacity);
            }
        }
        assert_eq!(live, self.len, "len out of sync with occupied slots");
        assert!(self.len <= self.threshold, "table overloaded");
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for HashCommon<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            slots: self.slots.clone(),
            len: self.len,
            threshold: self.threshold,
        }
    }
}

/// Iterator over occupied slots in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let b = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((&b.key, &b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over occupied slots with mutable values.
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Option<Bucket<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let b = self.slots.by_ref().flatten().next()?;
        self.remaining -= 1;
        Some((&b.key, &mut b.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
