//! Detached cursors with fail-fast concurrent-modification detection.
//!
//! Borrowing iterators (`iter`, `keys`, ...) are already protected by the
//! borrow checker. A `Cursor` instead holds no borrow: it remembers a slot
//! range and the table length at creation, and is advanced by handing it
//! the table each step. If the length changed in between, the step fails
//! before yielding anything.
//!
//! A cursor covers the half-open slot range `pos..end` and can be split in
//! two, so disjoint parts of one table can be walked independently. Both
//! halves keep the original length snapshot.

use crate::error::HashError;
use core::marker::PhantomData;

/// Position into a table of type `T`, advanced with `T`-specific `next`
/// methods defined next to each table.
pub struct Cursor<T: ?Sized> {
    pos: usize,
    end: usize,
    expected_len: usize,
    _table: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Cursor<T> {
    /// Cursor over slots `0..end` of a table currently holding
    /// `expected_len` entries.
    pub(crate) fn new(expected_len: usize, end: usize) -> Self {
        Self {
            pos: 0,
            end,
            expected_len,
            _table: PhantomData,
        }
    }

    /// Table length captured when the cursor was created.
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Bounds on the entries still to be yielded. The upper bound counts
    /// slots left in the range, empty ones included.
    pub fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.pos))
    }

    /// Split off the front of the remaining range and return it; `self`
    /// keeps the back. The front gets the larger half. Returns `None` when
    /// at most one slot remains.
    ///
    /// Walking the returned cursor and then `self` visits the same entries,
    /// in the same order, as walking `self` alone would have.
    pub fn split(&mut self) -> Option<Self> {
        let remaining = self.end - self.pos;
        if remaining <= 1 {
            return None;
        }
        let mid = self.pos + (remaining + 1) / 2;
        let front = Self {
            pos: self.pos,
            end: mid,
            expected_len: self.expected_len,
            _table: PhantomData,
        };
        self.pos = mid;
        Some(front)
    }

    /// Yield the next occupied slot of `slots` and its index, in ascending
    /// slot order.
    ///
    /// `current_len` is the table's live length now; `occupied` maps a slot
    /// to its item when the slot holds one.
    pub(crate) fn step<'a, S, R, F>(
        &mut self,
        current_len: usize,
        slots: &'a [S],
        occupied: F,
    ) -> Result<Option<(usize, R)>, HashError>
    where
        F: Fn(&'a S) -> Option<R>,
    {
        if current_len != self.expected_len {
            return Err(HashError::ConcurrentModification {
                expected: self.expected_len,
                found: current_len,
            });
        }
        let end = self.end.min(slots.len());
        while self.pos < end {
            let i = self.pos;
            self.pos += 1;
            if let Some(item) = occupied(&slots[i]) {
                return Ok(Some((i, item)));
            }
        }
        self.pos = self.end;
        Ok(None)
    }

    /// Slot index the next step starts from.
    #[cfg(test)]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }
}

impl<T: ?Sized> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            pos: self.pos,
            end: self.end,
            expected_len: self.expected_len,
            _table: PhantomData,
        }
    }
}

impl<T: ?Sized> core::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("end", &self.end)
            .field("expected_len", &self.expected_len)
            .finish()
    }
}
