//! Capacity table for the common (prime-sized) tables.
//!
//! Each entry is the smallest prime strictly greater than twice the one
//! before it, so growing always advances exactly one step.

use crate::error::HashError;

pub const PRIMES: [usize; 28] = [
    7, 17, 37, 79, 163, 331, 673, 1361, 2729, 5471, 10949, 21911, 43853, 87719, 175447, 350899,
    701819, 1403641, 2807303, 5614657, 11229331, 22458671, 44917381, 89834777, 179669557,
    359339171, 718678369, 1437356741,
];

pub const MIN_CAPACITY: usize = PRIMES[0];
pub const MAX_CAPACITY: usize = PRIMES[PRIMES.len() - 1];

/// Smallest table prime that is at least `hint`.
pub fn capacity_at_least(hint: usize) -> Result<usize, HashError> {
    PRIMES
        .iter()
        .copied()
        .find(|&p| p >= hint)
        .ok_or(HashError::CapacityExceeded {
            requested: hint,
            max: MAX_CAPACITY,
        })
}

/// Capacity to grow into from `current`: the smallest table prime strictly
/// greater than `2 * current`.
pub fn grown_capacity(current: usize) -> Result<usize, HashError> {
    let requested = current.saturating_mul(2);
    PRIMES
        .iter()
        .copied()
        .find(|&p| p > requested)
        .ok_or(HashError::CapacityExceeded {
            requested,
            max: MAX_CAPACITY,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prime(n: usize) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn table_is_ascending_primes_more_than_doubling() {
        for w in PRIMES.windows(2) {
            assert!(w[1] > 2 * w[0], "{} does not more than double {}", w[1], w[0]);
        }
        // Trial division on the large entries is slow; the small end is
        // enough to catch a typo in the table shape.
        for &p in PRIMES.iter().take(16) {
            assert!(is_prime(p), "{} is not prime", p);
        }
    }

    #[test]
    fn hint_rounds_up_to_table_prime() {
        assert_eq!(capacity_at_least(0), Ok(7));
        assert_eq!(capacity_at_least(7), Ok(7));
        assert_eq!(capacity_at_least(8), Ok(17));
        assert_eq!(capacity_at_least(100), Ok(163));
    }

    #[test]
    fn growth_steps_one_entry() {
        for w in PRIMES.windows(2) {
            assert_eq!(grown_capacity(w[0]), Ok(w[1]));
        }
    }

    #[test]
    fn exhaustion_is_reported() {
        assert_eq!(
            grown_capacity(MAX_CAPACITY),
            Err(HashError::CapacityExceeded {
                requested: MAX_CAPACITY * 2,
                max: MAX_CAPACITY,
            })
        );
        assert!(capacity_at_least(MAX_CAPACITY + 1).is_err());
    }
}
