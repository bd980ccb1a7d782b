//! Row views: a (table, row index) pair with typed field accessors.
//!
//! Neither view owns or copies anything.  Every accessor goes straight to
//! the bound row of the relevant column, so reading one field of a row never
//! touches the other columns.

use std::fmt;

use soa_core::RowId;

use crate::Table;
use crate::layout::{Field, Layout};

// ── RowRef ────────────────────────────────────────────────────────────────────

/// Shared view of one row.
///
/// Holds `&Table`, so the table cannot be structurally mutated while the
/// view is alive.
pub struct RowRef<'a, L: Layout> {
    table: &'a Table<L>,
    index: usize,
}

impl<'a, L: Layout> RowRef<'a, L> {
    /// `index` must be in bounds; the table checks before constructing.
    #[inline]
    pub(crate) fn new(table: &'a Table<L>, index: usize) -> Self {
        debug_assert!(index < table.len());
        Self { table, index }
    }

    /// Row index this view is bound to.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable id of the row.
    #[inline]
    pub fn id(&self) -> RowId {
        self.table.raw_id_at(self.index)
    }

    /// Field `I` of this row.
    #[inline]
    pub fn field<const I: usize>(&self) -> &'a <L as Field<I>>::Type
    where
        L: Field<I>,
    {
        <L as Field<I>>::column(self.table.raw_columns()).get(self.index)
    }

    /// All fields as a tuple of references, `(&A, &B, …)`.
    #[inline]
    pub fn get(&self) -> L::Refs<'a> {
        L::refs(self.table.raw_columns(), self.index)
    }
}

impl<L: Layout> Clone for RowRef<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Layout> Copy for RowRef<'_, L> {}

impl<'a, L: Layout> fmt::Debug for RowRef<'a, L>
where
    L::Refs<'a>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowRef")
            .field("index", &self.index)
            .field("fields", &self.get())
            .finish()
    }
}

// ── RowMut ────────────────────────────────────────────────────────────────────

/// Exclusive view of one row.
///
/// Fields can be read and written in place; the row count cannot change
/// through it.
pub struct RowMut<'a, L: Layout> {
    table: &'a mut Table<L>,
    index: usize,
}

impl<'a, L: Layout> RowMut<'a, L> {
    /// `index` must be in bounds; the table checks before constructing.
    #[inline]
    pub(crate) fn new(table: &'a mut Table<L>, index: usize) -> Self {
        debug_assert!(index < table.len());
        Self { table, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn id(&self) -> RowId {
        self.table.raw_id_at(self.index)
    }

    /// Field `I` of this row.
    #[inline]
    pub fn field<const I: usize>(&self) -> &<L as Field<I>>::Type
    where
        L: Field<I>,
    {
        <L as Field<I>>::column(self.table.raw_columns()).get(self.index)
    }

    /// Field `I` of this row, writable.
    #[inline]
    pub fn field_mut<const I: usize>(&mut self) -> &mut <L as Field<I>>::Type
    where
        L: Field<I>,
    {
        <L as Field<I>>::column_mut(self.table.raw_columns_mut()).get_mut(self.index)
    }

    /// Replace field `I`, returning the old value.
    #[inline]
    pub fn set_field<const I: usize>(
        &mut self,
        value: <L as Field<I>>::Type,
    ) -> <L as Field<I>>::Type
    where
        L: Field<I>,
    {
        <L as Field<I>>::column_mut(self.table.raw_columns_mut()).set(self.index, value)
    }

    /// All fields as shared references.
    #[inline]
    pub fn get(&self) -> L::Refs<'_> {
        L::refs(self.table.raw_columns(), self.index)
    }

    /// All fields as exclusive references, `(&mut A, &mut B, …)`.
    #[inline]
    pub fn get_mut(&mut self) -> L::Muts<'_> {
        L::muts(self.table.raw_columns_mut(), self.index)
    }

    /// Consume the view, keeping the exclusive references for `'a`.
    #[inline]
    pub fn into_mut(self) -> L::Muts<'a> {
        let Self { table, index } = self;
        L::muts(table.raw_columns_mut(), index)
    }

    /// Overwrite every field, returning the old row.
    #[inline]
    pub fn replace(&mut self, row: L) -> L {
        L::replace(self.table.raw_columns_mut(), self.index, row)
    }

    /// Downgrade to a shared view.
    #[inline]
    pub fn as_row_ref(&self) -> RowRef<'_, L> {
        RowRef::new(&*self.table, self.index)
    }
}
