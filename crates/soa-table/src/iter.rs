//! Row sequences.
//!
//! [`Rows`] walks a half-open range of row indices and yields a
//! [`RowRef`] per row.  It is a range plus a table reference, so cloning it
//! restarts from the same position and `nth` jumps in O(1).  The range is
//! fixed when the sequence is created; the borrow on the table guarantees it
//! stays valid.
//!
//! [`RowsMut`] carries one mutable slice per column and peels a row off the
//! front or back of all of them at once, yielding `(&mut A, &mut B, …)`.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::Table;
use crate::layout::Layout;
use crate::view::RowRef;

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Lazy sequence of row views over a table.
pub struct Rows<'a, L: Layout> {
    table: &'a Table<L>,
    range: Range<usize>,
}

impl<'a, L: Layout> Rows<'a, L> {
    pub(crate) fn new(table: &'a Table<L>) -> Self {
        Self {
            table,
            range: 0..table.len(),
        }
    }

    /// Rows not yet yielded, as an index range.
    pub fn remaining(&self) -> Range<usize> {
        self.range.clone()
    }
}

impl<L: Layout> Clone for Rows<'_, L> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            range: self.range.clone(),
        }
    }
}

impl<'a, L: Layout> Iterator for Rows<'a, L> {
    type Item = RowRef<'a, L>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some(RowRef::new(self.table, index))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let index = self.range.nth(n)?;
        Some(RowRef::new(self.table, index))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }

    #[inline]
    fn count(self) -> usize {
        self.range.len()
    }

    #[inline]
    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<L: Layout> DoubleEndedIterator for Rows<'_, L> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        Some(RowRef::new(self.table, index))
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        let index = self.range.nth_back(n)?;
        Some(RowRef::new(self.table, index))
    }
}

impl<L: Layout> ExactSizeIterator for Rows<'_, L> {}

impl<L: Layout> FusedIterator for Rows<'_, L> {}

// ── RowsMut ───────────────────────────────────────────────────────────────────

/// Lazy sequence of mutable field bundles over a table.
pub struct RowsMut<'a, L: Layout + 'a> {
    slices: L::SlicesMut<'a>,
}

impl<'a, L: Layout + 'a> RowsMut<'a, L> {
    pub(crate) fn new(slices: L::SlicesMut<'a>) -> Self {
        Self { slices }
    }
}

impl<'a, L: Layout + 'a> Iterator for RowsMut<'a, L> {
    type Item = L::Muts<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        L::split_first_mut(&mut self.slices)
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        L::advance_mut(&mut self.slices, n);
        L::split_first_mut(&mut self.slices)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = L::slices_len(&self.slices);
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        L::slices_len(&self.slices)
    }
}

impl<'a, L: Layout + 'a> DoubleEndedIterator for RowsMut<'a, L> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        L::split_last_mut(&mut self.slices)
    }

    #[inline]
    fn nth_back(&mut self, n: usize) -> Option<Self::Item> {
        L::advance_back_mut(&mut self.slices, n);
        L::split_last_mut(&mut self.slices)
    }
}

impl<'a, L: Layout + 'a> ExactSizeIterator for RowsMut<'a, L> {}

impl<'a, L: Layout + 'a> FusedIterator for RowsMut<'a, L> {}
