//! `SparseTable<L>` — columnar storage where rows never move.
//!
//! # Storage
//!
//! ```text
//! SparseTable<(u32, String)>        after remove(id of slot 1)
//!   generations : [ 2,   3,   2  ]   odd = hole
//!   free        : [ _,   _,   1  ]   stack; top at free[len]
//!   columns     : ([Some(1), None, Some(3)], [Some("a"), None, Some("c")])
//! ```
//!
//! A row is written into a free slot on insert and stays there until it is
//! removed; removal leaves a hole instead of moving the last row in.  Row
//! order is therefore slot order, and a [`RowId`]'s slot is the row's
//! storage position for its whole life.  Freed slots are reused
//! most-recent-first.
//!
//! Compared to [`Table`](crate::Table), removal never touches other rows,
//! at the price of holes: scans walk every slot up to `capacity()`.
//!
//! ```rust
//! use soa_table::SparseTable;
//!
//! let mut table: SparseTable<(i32, &str)> = SparseTable::new();
//! table.insert((1, "kek"));
//! let lol = table.insert((2, "lol"));
//! table.insert((3, "three"));
//!
//! assert_eq!(table.remove(lol), Some((2, "lol")));
//! let names: Vec<_> = table.column::<1>().map(|(_, name)| *name).collect();
//! assert_eq!(names, ["kek", "three"]);
//! ```
//!
//! Like the dense table, every sequence and reference borrows the table, so
//! none can outlive an insert or removal:
//!
//! ```compile_fail
//! use soa_table::SparseTable;
//!
//! let mut table: SparseTable<(u32,)> = SparseTable::new();
//! let id = table.insert((1,));
//! let (value,) = table.get(id).unwrap();
//! table.insert((2,));
//! assert_eq!(*value, 1);
//! ```

use std::fmt;
use std::iter::{Enumerate, FusedIterator};
use std::slice;

use soa_core::{MAX_ROWS, RowId, TableConfig};
use tracing::{debug, trace};

use crate::index::SlotIndex;
use crate::layout::{Field, Layout};

/// A growable set of rows of shape `L`, stored one slot-addressed column per
/// field.  Rows keep their slot until removed.
pub struct SparseTable<L: Layout> {
    index: SlotIndex,
    columns: L::SlotColumns,
    config: TableConfig,
}

impl<L: Layout> SparseTable<L> {
    /// An empty table with no allocation and the default growth policy.
    pub fn new() -> Self {
        Self {
            index: SlotIndex::default(),
            columns: L::new_slot_columns(),
            config: TableConfig::default(),
        }
    }

    /// An empty table with `capacity` free slots.
    ///
    /// # Panics
    ///
    /// If `capacity` exceeds [`MAX_ROWS`].
    pub fn with_capacity(capacity: usize) -> Self {
        let mut table = Self::new();
        table.reserve(capacity);
        table
    }

    /// Construct from a validated config.  Used by [`TableBuilder`](crate::TableBuilder).
    pub(crate) fn from_config(config: TableConfig) -> Self {
        let initial = config.initial_capacity;
        let mut table = Self {
            index: SlotIndex::default(),
            columns: L::new_slot_columns(),
            config,
        };
        if initial > 0 {
            table.grow_to(initial);
        }
        table
    }

    // ── Size ──────────────────────────────────────────────────────────────

    /// Number of live rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots, live or free.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    #[inline]
    pub const fn arity(&self) -> usize {
        L::ARITY
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // ── Growth ────────────────────────────────────────────────────────────

    /// Ensure at least `capacity` slots.  Existing rows keep their slots.
    ///
    /// # Panics
    ///
    /// If `capacity` exceeds [`MAX_ROWS`].  Allocation failure aborts.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.capacity() {
            return;
        }
        assert!(
            capacity <= MAX_ROWS,
            "requested capacity {capacity} exceeds the maximum of {MAX_ROWS} rows"
        );
        let target = self.config.next_capacity(self.capacity(), capacity);
        self.grow_to(target);
    }

    /// Ensure room for `additional` more rows beyond `len()`.
    pub fn reserve_additional(&mut self, additional: usize) {
        let wanted = self.len().checked_add(additional);
        self.reserve(wanted.unwrap_or(usize::MAX));
    }

    fn grow_to(&mut self, capacity: usize) {
        let old = self.capacity();
        self.index.grow(capacity);
        L::slot_grow(&mut self.columns, capacity);
        debug_assert_eq!(L::slot_capacity(&self.columns), capacity);
        trace!(from = old, to = capacity, arity = L::ARITY, "sparse table grow");
    }

    // ── Insertion / removal ───────────────────────────────────────────────

    /// Store `row` in a free slot and return its handle.
    pub fn insert(&mut self, row: L) -> RowId {
        let len = self.len();
        if len == self.capacity() {
            self.reserve(len + 1);
        }
        let id = self.index.push();
        L::slot_put(&mut self.columns, id.slot_index(), row);
        id
    }

    /// Remove the row named by `id`, returning its values, or `None` if that
    /// row is already gone.  No other row moves.
    pub fn remove(&mut self, id: RowId) -> Option<L> {
        let slot = self.index.remove(id)?;
        L::slot_take(&mut self.columns, slot)
    }

    /// Remove every row.  Slots are kept; every outstanding [`RowId`] is
    /// invalidated.
    pub fn clear(&mut self) {
        debug!(rows = self.len(), "sparse table clear");
        self.index.clear();
        L::slot_clear(&mut self.columns);
    }

    // ── Row access ────────────────────────────────────────────────────────

    /// `true` if `id` names a live row of this table.
    #[inline]
    pub fn contains(&self, id: RowId) -> bool {
        self.index.resolve(id).is_some()
    }

    /// All fields of the row named by `id`, or `None` if it was removed.
    pub fn get(&self, id: RowId) -> Option<L::Refs<'_>> {
        let slot = self.index.resolve(id)?;
        L::slot_refs(&self.columns, slot)
    }

    /// All fields of the row named by `id`, writable.
    pub fn get_mut(&mut self, id: RowId) -> Option<L::Muts<'_>> {
        let slot = self.index.resolve(id)?;
        L::slot_muts(&mut self.columns, slot)
    }

    /// Field `I` of the row named by `id`.
    pub fn field<const I: usize>(&self, id: RowId) -> Option<&<L as Field<I>>::Type>
    where
        L: Field<I>,
    {
        let slot = self.index.resolve(id)?;
        <L as Field<I>>::slot_column(&self.columns).get(slot)
    }

    /// Ids of all live rows, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = RowId> + '_ {
        (0..self.capacity()).filter_map(|slot| self.index.id_in(slot))
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// `(id, (&A, &B, …))` for every live row, in slot order.
    pub fn iter(&self) -> SparseRows<'_, L> {
        SparseRows {
            generations: self.index.generations().iter().enumerate(),
            slices: L::slot_slices(&self.columns),
            remaining: self.len(),
        }
    }

    /// `(id, (&mut A, &mut B, …))` for every live row, in slot order.
    pub fn iter_mut(&mut self) -> SparseRowsMut<'_, L> {
        SparseRowsMut {
            generations: self.index.generations().iter().enumerate(),
            slices: L::slot_slices_mut(&mut self.columns),
            remaining: self.index.len(),
        }
    }

    /// Call `f` with the id and writable fields of every live row, in slot
    /// order.
    pub fn for_each_row<'a, F>(&'a mut self, mut f: F)
    where
        F: FnMut(RowId, L::Muts<'a>),
    {
        for (id, row) in self.iter_mut() {
            f(id, row);
        }
    }

    // ── Column access ─────────────────────────────────────────────────────

    /// `(id, &value)` for column `I` across every live row, in slot order.
    ///
    /// ```rust
    /// # use soa_table::SparseTable;
    /// let table: SparseTable<(u8, f64)> = [(1, 0.5), (2, 1.5)].into_iter().collect();
    /// let total: f64 = table.column::<1>().map(|(_, v)| v).sum();
    /// assert_eq!(total, 2.0);
    /// ```
    pub fn column<const I: usize>(&self) -> ColumnSlots<'_, <L as Field<I>>::Type>
    where
        L: Field<I>,
    {
        ColumnSlots {
            generations: self.index.generations().iter().enumerate(),
            values: <L as Field<I>>::slot_column(&self.columns).as_slice().iter(),
            remaining: self.len(),
        }
    }

    /// `(id, &mut value)` for column `I` across every live row.
    pub fn column_mut<const I: usize>(&mut self) -> ColumnSlotsMut<'_, <L as Field<I>>::Type>
    where
        L: Field<I>,
    {
        ColumnSlotsMut {
            generations: self.index.generations().iter().enumerate(),
            values: <L as Field<I>>::slot_column_mut(&mut self.columns)
                .as_mut_slice()
                .iter_mut(),
            remaining: self.index.len(),
        }
    }
}

impl<L: Layout> Default for SparseTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Layout> Clone for SparseTable<L>
where
    L::SlotColumns: Clone,
{
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            config: self.config.clone(),
        }
    }
}

impl<L: Layout> fmt::Debug for SparseTable<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseTable")
            .field("arity", &L::ARITY)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<L: Layout> Extend<L> for SparseTable<L> {
    fn extend<I: IntoIterator<Item = L>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_additional(lower);
        for row in iter {
            self.insert(row);
        }
    }
}

impl<L: Layout> FromIterator<L> for SparseTable<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, L: Layout> IntoIterator for &'a SparseTable<L> {
    type Item = (RowId, L::Refs<'a>);
    type IntoIter = SparseRows<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, L: Layout> IntoIterator for &'a mut SparseTable<L> {
    type Item = (RowId, L::Muts<'a>);
    type IntoIter = SparseRowsMut<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// ── Row sequences ─────────────────────────────────────────────────────────────

/// Live rows of a [`SparseTable`], skipping holes.
pub struct SparseRows<'a, L: Layout + 'a> {
    generations: Enumerate<slice::Iter<'a, u32>>,
    slices: L::SlotSlices<'a>,
    remaining: usize,
}

impl<'a, L: Layout + 'a> Iterator for SparseRows<'a, L> {
    type Item = (RowId, L::Refs<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let (slot, &generation) = self.generations.next()?;
            if let Some(row) = L::slot_split_first(&mut self.slices)? {
                self.remaining -= 1;
                return Some((RowId::new(slot as u32, generation), row));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, L: Layout + 'a> ExactSizeIterator for SparseRows<'a, L> {}

impl<'a, L: Layout + 'a> FusedIterator for SparseRows<'a, L> {}

/// Live rows of a [`SparseTable`] as writable field bundles.
pub struct SparseRowsMut<'a, L: Layout + 'a> {
    generations: Enumerate<slice::Iter<'a, u32>>,
    slices: L::SlotSlicesMut<'a>,
    remaining: usize,
}

impl<'a, L: Layout + 'a> Iterator for SparseRowsMut<'a, L> {
    type Item = (RowId, L::Muts<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let (slot, &generation) = self.generations.next()?;
            if let Some(row) = L::slot_split_first_mut(&mut self.slices)? {
                self.remaining -= 1;
                return Some((RowId::new(slot as u32, generation), row));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, L: Layout + 'a> ExactSizeIterator for SparseRowsMut<'a, L> {}

impl<'a, L: Layout + 'a> FusedIterator for SparseRowsMut<'a, L> {}

// ── Column sequences ──────────────────────────────────────────────────────────

/// One column of a [`SparseTable`] as `(id, &value)` pairs.
pub struct ColumnSlots<'a, T> {
    generations: Enumerate<slice::Iter<'a, u32>>,
    values: slice::Iter<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for ColumnSlots<'a, T> {
    type Item = (RowId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let (slot, &generation) = self.generations.next()?;
            if let Some(value) = self.values.next()? {
                self.remaining -= 1;
                return Some((RowId::new(slot as u32, generation), value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ColumnSlots<'_, T> {}

impl<T> FusedIterator for ColumnSlots<'_, T> {}

impl<T> Clone for ColumnSlots<'_, T> {
    fn clone(&self) -> Self {
        Self {
            generations: self.generations.clone(),
            values: self.values.clone(),
            remaining: self.remaining,
        }
    }
}

/// One column of a [`SparseTable`] as `(id, &mut value)` pairs.
pub struct ColumnSlotsMut<'a, T> {
    generations: Enumerate<slice::Iter<'a, u32>>,
    values: slice::IterMut<'a, Option<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for ColumnSlotsMut<'a, T> {
    type Item = (RowId, &'a mut T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            let (slot, &generation) = self.generations.next()?;
            if let Some(value) = self.values.next()? {
                self.remaining -= 1;
                return Some((RowId::new(slot as u32, generation), value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for ColumnSlotsMut<'_, T> {}

impl<T> FusedIterator for ColumnSlotsMut<'_, T> {}
