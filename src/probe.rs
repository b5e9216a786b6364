//! Probe arithmetic shared by both table families.
//!
//! Both families probe downward with wraparound from a key's ideal slot, and
//! both repair probe chains on removal with the same backward-shift rule.

/// Outcome of probing for a key.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Probe {
    /// The key lives at this index.
    Found(usize),
    /// The key is absent; this is the first empty index on its probe path.
    Vacant(usize),
}

/// Odd multiplier spreading low-quality hashes across a prime-sized table.
const IMPROVE: u64 = 127;

/// Next index on a probe path.
#[inline]
pub(crate) fn prev_index(index: usize, capacity: usize) -> usize {
    if index == 0 {
        capacity - 1
    } else {
        index - 1
    }
}

/// Ideal slot for a common (prime-sized) table.
#[inline]
pub(crate) fn prime_slot(hash: u64, capacity: usize) -> usize {
    (hash.wrapping_mul(IMPROVE) % capacity as u64) as usize
}

/// Ideal slot for a power-of-two positions table.
#[inline]
pub(crate) fn masked_slot(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}

/// Number of probe steps from `from` down to `to`.
#[inline]
fn distance(from: usize, to: usize, capacity: usize) -> usize {
    (from + capacity - to) % capacity
}

/// Backward-shift test for Algorithm R under downward probing.
///
/// `here` has just become empty. The occupant of `scan` (ideal slot `ideal`)
/// probes `ideal, ideal - 1, ..., scan`. If `here` is on that path the hole
/// now cuts the occupant off, so it has to move into `here`.
#[inline]
pub(crate) fn must_shift(here: usize, scan: usize, ideal: usize, capacity: usize) -> bool {
    distance(ideal, here, capacity) < distance(ideal, scan, capacity)
}
