//! Error type shared by both table families.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum HashError {
    /// A table was asked to hold more than its largest supported capacity.
    #[error("capacity exceeded: requested {requested}, maximum is {max}")]
    CapacityExceeded { requested: usize, max: usize },

    /// The table changed size between two steps of a detached cursor.
    #[error("concurrent modification: expected {expected} entries, found {found}")]
    ConcurrentModification { expected: usize, found: usize },
}

/// Insertions cannot return an error without burdening every caller, so an
/// exhausted table is fatal, the same way `Vec` treats capacity overflow.
#[cold]
#[inline(never)]
pub(crate) fn capacity_exhausted(err: HashError) -> ! {
    panic!("{}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_numbers() {
        let e = HashError::CapacityExceeded {
            requested: 10,
            max: 7,
        };
        assert_eq!(e.to_string(), "capacity exceeded: requested 10, maximum is 7");

        let e = HashError::ConcurrentModification {
            expected: 3,
            found: 4,
        };
        assert_eq!(
            e.to_string(),
            "concurrent modification: expected 3 entries, found 4"
        );
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn exhaustion_panics_with_message() {
        capacity_exhausted(HashError::CapacityExceeded {
            requested: 1,
            max: 0,
        });
    }
}
