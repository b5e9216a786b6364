//! graph-hash: open-addressing hash maps and sets for graph storage.
//!
//! Internal Design:
//!
//! Summary
//! - Two table families share one probing discipline and one removal
//!   algorithm, and differ in how slots are sized and what a slot holds.
//! - Layers:
//!   - `HashCommon<K, V, S>`: prime-sized slot array holding buckets
//!     directly. `HashCommonMap` and `HashCommonSet` wrap it.
//!   - `FastHash<K, V, S>`: dense entries array with a free list, indexed
//!     by a power-of-two positions array. Entry indices are stable for the
//!     life of an entry and are handed back out after removal.
//!     `FastHashMap` and `FastHashSet` wrap it.
//!
//! Probing
//! - Lookups start at the key's ideal slot and walk downward, wrapping
//!   from slot 0 to the last slot, until they hit the key or an empty slot.
//! - Prime tables scramble the hash (`hash * 127 mod capacity`); the
//!   positions array masks the hash with `len - 1`.
//! - Removal never leaves tombstones. The emptied slot is refilled by
//!   shifting later members of the cluster back (Knuth's Algorithm R),
//!   so every live key stays reachable from its ideal slot.
//!
//! Growth
//! - Prime tables keep at most half their slots occupied and grow to the
//!   smallest listed prime above twice the current capacity.
//! - Positions arrays double once the dense entries would fill more than
//!   half of them. The entries array grows by half again when full.
//! - `clear()` releases the arrays and starts over at the minimum size,
//!   whatever hint the table was built with.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash. Growth re-places entries from the
//!   stored hash and probes compare it before calling `K: Eq`, so `K: Hash`
//!   runs once per insertion.
//!
//! Iteration
//! - Borrowing iterators are checked by the borrow checker. Detached
//!   [`Cursor`]s hold no borrow; they compare the table length on each
//!   step and report [`HashError::ConcurrentModification`] on a change.
//!
//! Notes and non-goals
//! - Single-threaded: tables do no internal locking.
//! - No null keys: emptiness is `Option::None`, never a key value.

mod error;

pub mod cursor;
pub mod fast_hash;
pub mod fast_hash_map;
pub mod fast_hash_set;
pub mod hash_common;
pub mod hash_common_map;
pub mod hash_common_set;
pub mod primes;
mod probe;
pub mod traits;

mod fast_hash_proptest;
mod hash_common_proptest;
mod test_util;

// Public surface
pub use cursor::Cursor;
pub use error::HashError;
pub use fast_hash_map::FastHashMap;
pub use fast_hash_set::FastHashSet;
pub use hash_common_map::HashCommonMap;
pub use hash_common_set::HashCommonSet;
pub use traits::{IndexedMapOps, IndexedSetOps, MapOps, MapSetCommon, SetOps};
