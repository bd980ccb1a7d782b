//! `Table<L>` — the Structure-of-Arrays container.
//!
//! # Storage
//!
//! ```text
//! Table<(u32, f32, String)>
//!   index   : Index              ids[i] ↔ row i, slot → (generation, i)
//!   columns : (Column<u32>, Column<f32>, Column<String>)
//!               [ 1,  2,  3 ]    [0.1, 0.2, 0.3]    ["a", "b", "c"]
//!                 ^ row 1 is (2, 0.2, "b") at index 1 of every column
//! ```
//!
//! Every column and the index always hold exactly `len()` rows and room for
//! exactly `capacity()` rows.  All structural mutation goes through one
//! routine per operation (`emplace_row`, `erase_row`, `reserve`, `clear`)
//! that touches every column before returning, so no caller can observe a
//! column out of step with the others.
//!
//! # Removal policy: swap-erase
//!
//! [`Table::erase_row`] and [`Table::remove`] move the *last* row into the
//! freed index and shrink by one.  Removal is O(1) and row order is **not**
//! preserved.  [`RowId`]s are unaffected by the move; row indices are not.
//!
//! # Invalidation
//!
//! Growth reallocates every column.  Row views ([`RowRef`], [`RowMut`]) and
//! row sequences ([`Rows`], [`RowsMut`]) borrow the table, and every
//! operation that may move rows (`emplace_row`, `insert`, `erase_row`,
//! `remove`, `reserve`, `clear`, `set_row`) takes `&mut self`, so the compiler
//! rejects any view that would outlive such a call.  A [`RowId`] survives all
//! of them and is re-resolved with [`Table::position`] / [`Table::get`].
//!
//! A row view held across an insert:
//!
//! ```compile_fail
//! use soa_table::Table;
//!
//! let mut table: Table<(u32, &str)> = Table::new();
//! table.emplace_row((1, "a"));
//! let row = table.at(0).unwrap();
//! table.emplace_row((2, "b"));
//! assert_eq!(row.get(), (&1, &"a"));
//! ```
//!
//! Erasing while a row sequence is live:
//!
//! ```compile_fail
//! use soa_table::Table;
//!
//! let mut table: Table<(u32,)> = [(1,), (2,), (3,)].into_iter().collect();
//! for _row in table.iter() {
//!     table.erase_row(0).unwrap();
//! }
//! ```
//!
//! A column slice held across growth:
//!
//! ```compile_fail
//! use soa_table::Table;
//!
//! let mut table: Table<(u32,)> = Table::new();
//! table.emplace_row((7,));
//! let column = table.column::<0>();
//! table.reserve(1_000);
//! assert_eq!(column[0], 7);
//! ```
//!
//! The same sequence of operations compiles once the view is re-acquired
//! through its id:
//!
//! ```rust
//! use soa_table::Table;
//!
//! let mut table: Table<(u32, &str)> = Table::new();
//! let id = table.insert((1, "a"));
//! table.emplace_row((2, "b"));
//! table.reserve(1_000);
//! table.erase_row(1).unwrap();
//! assert_eq!(table.get(id).unwrap().get(), (&1, &"a"));
//! ```

use std::fmt;

use soa_core::{MAX_ROWS, RowId, TableConfig, TableError, TableResult};
use tracing::{debug, trace};

use crate::index::Index;
use crate::iter::{Rows, RowsMut};
use crate::layout::{Field, Layout};
use crate::view::{RowMut, RowRef};

/// A growable sequence of rows of shape `L`, stored one column per field.
///
/// ```rust
/// use soa_table::Table;
///
/// let mut table: Table<(u32, &str)> = Table::new();
/// table.emplace_row((1, "a"));
/// table.emplace_row((2, "b"));
/// table.emplace_row((3, "c"));
/// assert_eq!(table.len(), 3);
///
/// // Scan one field without touching the other.
/// let total: u32 = table.column::<0>().iter().sum();
/// assert_eq!(total, 6);
///
/// // Swap-erase: the last row takes index 0.
/// table.erase_row(0).unwrap();
/// assert_eq!(table.column::<0>(), &[3, 2]);
/// assert_eq!(table.column::<1>(), &["c", "b"]);
/// ```
pub struct Table<L: Layout> {
    index: Index,
    columns: L::Columns,
    config: TableConfig,
}

impl<L: Layout> Table<L> {
    /// An empty table with no allocation and the default growth policy.
    pub fn new() -> Self {
        Self {
            index: Index::default(),
            columns: L::new_columns(),
            config: TableConfig::default(),
        }
    }

    /// An empty table with room for at least `capacity` rows.
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
            index: Index::default(),
            columns: L::new_columns(),
            config,
        };
        if initial > 0 {
            table.grow_to(initial);
        }
        table
    }

    // ── Size ──────────────────────────────────────────────────────────────

    /// Number of rows.  Equals the length of every column.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows the table can hold before the next reallocation.  Every column
    /// has room for at least this many.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Number of columns.
    #[inline]
    pub const fn arity(&self) -> usize {
        L::ARITY
    }

    /// The growth configuration this table was built with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    // ── Growth ────────────────────────────────────────────────────────────

    /// Ensure room for at least `capacity` rows in one coordinated step.
    ///
    /// No-op if the table is already large enough; otherwise grows every
    /// column (and the id index) to the same new capacity, chosen by the
    /// table's [`TableConfig`].  Growing invalidates all raw references into
    /// the columns.
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
        L::reserve(&mut self.columns, capacity);
        debug_assert!(L::min_capacity(&self.columns) >= capacity);
        trace!(from = old, to = capacity, arity = L::ARITY, "table grow");
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Append one row, one value per column in field order, returning its
    /// index (the previous `len()`).
    ///
    /// This is the table's only insertion primitive; [`insert`](Self::insert),
    /// [`Extend`] and [`FromIterator`] all go through it.  If the table is
    /// full it first grows every column together (see [`reserve`](Self::reserve)).
    pub fn emplace_row(&mut self, row: L) -> usize {
        let index = self.len();
        if index == self.capacity() {
            self.reserve(index + 1);
        }
        self.index.push();
        L::push(&mut self.columns, row);
        debug_assert!(L::lengths_match(&self.columns, self.len()));
        index
    }

    /// Append one row and return a stable handle to it.
    pub fn insert(&mut self, row: L) -> RowId {
        let index = self.emplace_row(row);
        self.index.id_at(index)
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Swap-erase the row at `index`, returning its values.
    ///
    /// The last row moves into `index`; rows below `index` are untouched.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] if `index >= len()`.
    pub fn erase_row(&mut self, index: usize) -> TableResult<L> {
        self.check_index(index)?;
        self.index.remove_at(index);
        Ok(self.swap_remove_columns(index))
    }

    /// Swap-erase the row named by `id`, returning its values, or `None` if
    /// that row is already gone.
    pub fn remove(&mut self, id: RowId) -> Option<L> {
        let index = self.index.remove(id)?;
        Some(self.swap_remove_columns(index))
    }

    fn swap_remove_columns(&mut self, index: usize) -> L {
        let row = L::swap_remove(&mut self.columns, index);
        debug_assert!(L::lengths_match(&self.columns, self.len()));
        row
    }

    /// Remove every row.  Capacity is kept; every outstanding [`RowId`] is
    /// invalidated.
    pub fn clear(&mut self) {
        debug!(rows = self.len(), "table clear");
        self.index.clear();
        L::clear(&mut self.columns);
    }

    /// Overwrite the row at `index`, returning the previous values.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] if `index >= len()`.
    pub fn set_row(&mut self, index: usize, row: L) -> TableResult<L> {
        self.check_index(index)?;
        Ok(L::replace(&mut self.columns, index, row))
    }

    // ── Row access ────────────────────────────────────────────────────────

    /// View of the row at `index`.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> TableResult<RowRef<'_, L>> {
        self.check_index(index)?;
        Ok(RowRef::new(self, index))
    }

    /// Mutable view of the row at `index`.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> TableResult<RowMut<'_, L>> {
        self.check_index(index)?;
        Ok(RowMut::new(self, index))
    }

    /// View of the row named by `id`, or `None` if it was removed.
    pub fn get(&self, id: RowId) -> Option<RowRef<'_, L>> {
        let index = self.index.position(id)?;
        Some(RowRef::new(self, index))
    }

    /// Mutable view of the row named by `id`, or `None` if it was removed.
    pub fn get_mut(&mut self, id: RowId) -> Option<RowMut<'_, L>> {
        let index = self.index.position(id)?;
        Some(RowMut::new(self, index))
    }

    /// `true` if `id` names a live row of this table.
    #[inline]
    pub fn contains(&self, id: RowId) -> bool {
        self.index.position(id).is_some()
    }

    /// Current row index of `id`.
    ///
    /// # Errors
    ///
    /// [`TableError::StaleId`] if the row was removed.
    pub fn position(&self, id: RowId) -> TableResult<usize> {
        self.index.position(id).ok_or(TableError::StaleId(id))
    }

    /// Id of the row at `index`.
    ///
    /// # Errors
    ///
    /// [`TableError::RowOutOfRange`] if `index >= len()`.
    pub fn id_at(&self, index: usize) -> TableResult<RowId> {
        self.check_index(index)?;
        Ok(self.index.id_at(index))
    }

    /// Ids of all rows, in row order.
    #[inline]
    pub fn ids(&self) -> &[RowId] {
        self.index.live_ids()
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    /// Row views over `[0, len())`.
    pub fn iter(&self) -> Rows<'_, L> {
        Rows::new(self)
    }

    /// Mutable field bundles over `[0, len())`.
    pub fn iter_mut(&mut self) -> RowsMut<'_, L> {
        RowsMut::new(L::slices_mut(&mut self.columns))
    }

    // ── Column access ─────────────────────────────────────────────────────

    /// Column `I` as a slice, indexed by row index.
    ///
    /// ```rust
    /// # use soa_table::Table;
    /// let table: Table<(u8, f64)> = [(1, 0.5), (2, 1.5)].into_iter().collect();
    /// assert_eq!(table.column::<1>(), &[0.5, 1.5]);
    /// ```
    #[inline]
    pub fn column<const I: usize>(&self) -> &[<L as Field<I>>::Type]
    where
        L: Field<I>,
    {
        <L as Field<I>>::column(&self.columns).as_slice()
    }

    /// Column `I` as a mutable slice.  Length cannot change through it.
    #[inline]
    pub fn column_mut<const I: usize>(&mut self) -> &mut [<L as Field<I>>::Type]
    where
        L: Field<I>,
    {
        <L as Field<I>>::column_mut(&mut self.columns).as_mut_slice()
    }

    /// Column `I` paired with the id of each row.
    pub fn column_with_ids<const I: usize>(
        &self,
    ) -> impl ExactSizeIterator<Item = (RowId, &<L as Field<I>>::Type)> + '_
    where
        L: Field<I>,
    {
        self.ids().iter().copied().zip(self.column::<I>())
    }

    /// Every column as a slice, in field order.
    #[inline]
    pub fn columns(&self) -> L::Slices<'_> {
        L::slices(&self.columns)
    }

    /// Every column as a mutable slice, in field order.  The slices are
    /// disjoint borrows, so several columns can be written in one pass.
    #[inline]
    pub fn columns_mut(&mut self) -> L::SlicesMut<'_> {
        L::slices_mut(&mut self.columns)
    }

    // ── Crate-internal plumbing for views ─────────────────────────────────

    #[inline]
    pub(crate) fn raw_columns(&self) -> &L::Columns {
        &self.columns
    }

    #[inline]
    pub(crate) fn raw_columns_mut(&mut self) -> &mut L::Columns {
        &mut self.columns
    }

    #[inline]
    pub(crate) fn raw_id_at(&self, index: usize) -> RowId {
        self.index.id_at(index)
    }

    #[inline]
    fn check_index(&self, index: usize) -> TableResult<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(TableError::out_of_range(index, self.len()))
        }
    }
}

impl<L: Layout> Default for Table<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Layout> Clone for Table<L>
where
    L::Columns: Clone,
{
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            config: self.config.clone(),
        }
    }
}

impl<L: Layout> fmt::Debug for Table<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("arity", &L::ARITY)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<L: Layout> Extend<L> for Table<L> {
    fn extend<I: IntoIterator<Item = L>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_additional(lower);
        for row in iter {
            self.emplace_row(row);
        }
    }
}

impl<L: Layout> FromIterator<L> for Table<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, L: Layout> IntoIterator for &'a Table<L> {
    type Item = RowRef<'a, L>;
    type IntoIter = Rows<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, L: Layout> IntoIterator for &'a mut Table<L> {
    type Item = L::Muts<'a>;
    type IntoIter = RowsMut<'a, L>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
