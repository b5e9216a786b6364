#![cfg(test)]

// Deterministic hashing helpers for in-crate tests: keys choose their own
// hash so tests can build collision clusters on purpose.

use core::hash::{BuildHasher, Hash, Hasher};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PassThrough;

pub(crate) struct PassThroughHasher(u64);

impl BuildHasher for PassThrough {
    type Hasher = PassThroughHasher;
    fn build_hasher(&self) -> Self::Hasher {
        PassThroughHasher(0)
    }
}

impl Hasher for PassThroughHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ b as u64;
        }
    }
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

/// Key whose hash is exactly `hash`; `id` tells colliding keys apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct Collide {
    pub hash: u64,
    pub id: u32,
}

impl Collide {
    pub fn new(hash: u64, id: u32) -> Self {
        Self { hash, id }
    }
}

impl Hash for Collide {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// A hash whose prime-table ideal slot is `slot`.
pub(crate) fn hash_for_prime_slot(slot: usize, capacity: usize) -> u64 {
    (0u64..)
        .find(|&h| crate::probe::prime_slot(h, capacity) == slot)
        .unwrap()
}
