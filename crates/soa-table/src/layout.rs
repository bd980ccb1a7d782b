//! Compile-time row shapes.
//!
//! A row shape is a plain Rust tuple.  `(f32, u32, String)` describes a table
//! with three columns: a `Column<f32>`, a `Column<u32>` and a
//! `Column<String>`.  [`Layout`] is implemented for every tuple of arity
//! 1 through 12 and supplies, with no runtime state:
//!
//! - the column tuple a table stores (`Layout::Columns`),
//! - the per-row reference bundles handed out by row views
//!   (`Layout::Refs` / `Layout::Muts`),
//! - the per-column slice bundles (`Layout::Slices` / `Layout::SlicesMut`),
//! - the fan-out routines that apply one row-level operation to every column
//!   in the same call,
//! - the same set again for slot storage (`Layout::SlotColumns`), used by
//!   [`SparseTable`](crate::SparseTable), where rows keep their slot and
//!   removed rows leave holes.
//!
//! [`Field<I>`] projects position `I` of the shape onto its column.  Access
//! is positional, so a shape may repeat a type (`(f64, f64)`) without
//! ambiguity.
//!
//! Shapes that are not tables are rejected by the compiler: `()` has no
//! `Layout` impl, and a `Field<I>` past the last position does not exist.
//!
//! ```compile_fail
//! let table = soa_table::Table::<()>::new();
//! ```
//!
//! ```compile_fail
//! let table = soa_table::Table::<(u32, f32)>::new();
//! let _ = table.column::<2>();
//! ```

use std::mem;

use crate::column::{Column, SlotColumn};

/// A tuple shape that can be stored column-by-column.
///
/// The trait is sealed (only implementable inside this crate) via the private
/// `Sealed` supertrait: every method must touch every column, and an external
/// implementation that skipped one would break the equal-length invariant.
///
/// All methods are plumbing for [`Table`](crate::Table); use the table's API
/// instead of calling them directly.
pub trait Layout: Sized + sealed::Sealed {
    /// Number of fields (columns) in the shape.
    const ARITY: usize;

    /// One `Column<T>` per field, in field order.
    type Columns;

    /// Shared references to one row's fields: `(&A, &B, …)`.
    type Refs<'a>
    where
        Self: 'a;

    /// Exclusive references to one row's fields: `(&mut A, &mut B, …)`.
    type Muts<'a>
    where
        Self: 'a;

    /// Every column as a slice: `(&[A], &[B], …)`.
    type Slices<'a>
    where
        Self: 'a;

    /// Every column as a mutable slice: `(&mut [A], &mut [B], …)`.
    type SlicesMut<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn new_columns() -> Self::Columns;

    /// Append one value to each column.
    #[doc(hidden)]
    fn push(columns: &mut Self::Columns, row: Self);

    /// Swap-erase `index` in each column, returning the removed values.
    #[doc(hidden)]
    fn swap_remove(columns: &mut Self::Columns, index: usize) -> Self;

    #[doc(hidden)]
    fn replace(columns: &mut Self::Columns, index: usize, row: Self) -> Self;

    /// Grow each column to hold at least `capacity` values.
    #[doc(hidden)]
    fn reserve(columns: &mut Self::Columns, capacity: usize);

    #[doc(hidden)]
    fn clear(columns: &mut Self::Columns);

    /// `true` if every column holds exactly `len` values.
    #[doc(hidden)]
    fn lengths_match(columns: &Self::Columns, len: usize) -> bool;

    /// Smallest physical capacity among the columns.
    #[doc(hidden)]
    fn min_capacity(columns: &Self::Columns) -> usize;

    #[doc(hidden)]
    fn refs<'a>(columns: &'a Self::Columns, index: usize) -> Self::Refs<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn muts<'a>(columns: &'a mut Self::Columns, index: usize) -> Self::Muts<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slices<'a>(columns: &'a Self::Columns) -> Self::Slices<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slices_mut<'a>(columns: &'a mut Self::Columns) -> Self::SlicesMut<'a>
    where
        Self: 'a;

    /// Rows left in a mutable slice bundle.
    #[doc(hidden)]
    fn slices_len<'a>(slices: &Self::SlicesMut<'a>) -> usize
    where
        Self: 'a;

    /// Detach the first row of a mutable slice bundle.
    #[doc(hidden)]
    fn split_first_mut<'a>(slices: &mut Self::SlicesMut<'a>) -> Option<Self::Muts<'a>>
    where
        Self: 'a;

    /// Detach the last row of a mutable slice bundle.
    #[doc(hidden)]
    fn split_last_mut<'a>(slices: &mut Self::SlicesMut<'a>) -> Option<Self::Muts<'a>>
    where
        Self: 'a;

    /// Drop the first `n` rows (or all, if fewer remain).
    #[doc(hidden)]
    fn advance_mut<'a>(slices: &mut Self::SlicesMut<'a>, n: usize)
    where
        Self: 'a;

    /// Drop the last `n` rows (or all, if fewer remain).
    #[doc(hidden)]
    fn advance_back_mut<'a>(slices: &mut Self::SlicesMut<'a>, n: usize)
    where
        Self: 'a;

    /// One `SlotColumn<T>` per field, in field order.
    type SlotColumns;

    /// Every slot column as a slice of optional values.
    type SlotSlices<'a>
    where
        Self: 'a;

    type SlotSlicesMut<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn new_slot_columns() -> Self::SlotColumns;

    /// Extend each slot column with empty slots up to `capacity`.
    #[doc(hidden)]
    fn slot_grow(columns: &mut Self::SlotColumns, capacity: usize);

    /// Store one value per column in the empty slot `slot`.
    #[doc(hidden)]
    fn slot_put(columns: &mut Self::SlotColumns, slot: usize, row: Self);

    /// Empty `slot` in each column, returning the row if it was occupied.
    #[doc(hidden)]
    fn slot_take(columns: &mut Self::SlotColumns, slot: usize) -> Option<Self>;

    #[doc(hidden)]
    fn slot_clear(columns: &mut Self::SlotColumns);

    /// Smallest slot count among the columns.
    #[doc(hidden)]
    fn slot_capacity(columns: &Self::SlotColumns) -> usize;

    #[doc(hidden)]
    fn slot_refs<'a>(columns: &'a Self::SlotColumns, slot: usize) -> Option<Self::Refs<'a>>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slot_muts<'a>(columns: &'a mut Self::SlotColumns, slot: usize) -> Option<Self::Muts<'a>>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slot_slices<'a>(columns: &'a Self::SlotColumns) -> Self::SlotSlices<'a>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slot_slices_mut<'a>(columns: &'a mut Self::SlotColumns) -> Self::SlotSlicesMut<'a>
    where
        Self: 'a;

    /// Detach the first slot of a bundle: `None` once the bundle is empty,
    /// `Some(None)` for a hole.
    #[doc(hidden)]
    fn slot_split_first<'a>(slices: &mut Self::SlotSlices<'a>) -> Option<Option<Self::Refs<'a>>>
    where
        Self: 'a;

    #[doc(hidden)]
    fn slot_split_first_mut<'a>(
        slices: &mut Self::SlotSlicesMut<'a>,
    ) -> Option<Option<Self::Muts<'a>>>
    where
        Self: 'a;
}

/// Position `I` of a row shape.
///
/// `<(u32, String) as Field<1>>::Type` is `String`.
pub trait Field<const I: usize>: Layout {
    /// Element type stored in column `I`.
    type Type;

    #[doc(hidden)]
    fn column(columns: &Self::Columns) -> &Column<Self::Type>;

    #[doc(hidden)]
    fn column_mut(columns: &mut Self::Columns) -> &mut Column<Self::Type>;

    #[doc(hidden)]
    fn slot_column(columns: &Self::SlotColumns) -> &SlotColumn<Self::Type>;

    #[doc(hidden)]
    fn slot_column_mut(columns: &mut Self::SlotColumns) -> &mut SlotColumn<Self::Type>;
}

mod sealed {
    pub trait Sealed {}
}

/// Implement `Layout` and every `Field<I>` for one tuple arity.
macro_rules! impl_layout {
    (@field [$($All:ident),+]) => {};

    (@field [$($All:ident),+] $idx:tt : $T:ident $(, $rest_idx:tt : $Rest:ident)*) => {
        impl<$($All),+> Field<$idx> for ($($All,)+) {
            type Type = $T;

            #[inline(always)]
            fn column(columns: &Self::Columns) -> &Column<$T> {
                &columns.$idx
            }

            #[inline(always)]
            fn column_mut(columns: &mut Self::Columns) -> &mut Column<$T> {
                &mut columns.$idx
            }

            #[inline(always)]
            fn slot_column(columns: &Self::SlotColumns) -> &SlotColumn<$T> {
                &columns.$idx
            }

            #[inline(always)]
            fn slot_column_mut(columns: &mut Self::SlotColumns) -> &mut SlotColumn<$T> {
                &mut columns.$idx
            }
        }

        impl_layout!(@field [$($All),+] $($rest_idx : $Rest),*);
    };

    ($arity:literal => $($idx:tt : $T:ident),+) => {
        impl<$($T),+> sealed::Sealed for ($($T,)+) {}

        impl<$($T),+> Layout for ($($T,)+) {
            const ARITY: usize = $arity;

            type Columns = ($(Column<$T>,)+);
            type Refs<'a> = ($(&'a $T,)+) where Self: 'a;
            type Muts<'a> = ($(&'a mut $T,)+) where Self: 'a;
            type Slices<'a> = ($(&'a [$T],)+) where Self: 'a;
            type SlicesMut<'a> = ($(&'a mut [$T],)+) where Self: 'a;

            type SlotColumns = ($(SlotColumn<$T>,)+);
            type SlotSlices<'a> = ($(&'a [Option<$T>],)+) where Self: 'a;
            type SlotSlicesMut<'a> = ($(&'a mut [Option<$T>],)+) where Self: 'a;

            fn new_columns() -> Self::Columns {
                ($(Column::<$T>::new(),)+)
            }

            #[inline]
            fn push(columns: &mut Self::Columns, row: Self) {
                $( columns.$idx.append(row.$idx); )+
            }

            #[inline]
            fn swap_remove(columns: &mut Self::Columns, index: usize) -> Self {
                ($(columns.$idx.erase(index),)+)
            }

            #[inline]
            fn replace(columns: &mut Self::Columns, index: usize, row: Self) -> Self {
                ($(columns.$idx.set(index, row.$idx),)+)
            }

            fn reserve(columns: &mut Self::Columns, capacity: usize) {
                $( columns.$idx.reserve(capacity); )+
            }

            fn clear(columns: &mut Self::Columns) {
                $( columns.$idx.clear(); )+
            }

            fn lengths_match(columns: &Self::Columns, len: usize) -> bool {
                true $(&& columns.$idx.len() == len)+
            }

            fn min_capacity(columns: &Self::Columns) -> usize {
                usize::MAX $(.min(columns.$idx.capacity()))+
            }

            #[inline]
            fn refs<'a>(columns: &'a Self::Columns, index: usize) -> Self::Refs<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.get(index),)+)
            }

            #[inline]
            fn muts<'a>(columns: &'a mut Self::Columns, index: usize) -> Self::Muts<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.get_mut(index),)+)
            }

            #[inline]
            fn slices<'a>(columns: &'a Self::Columns) -> Self::Slices<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.as_slice(),)+)
            }

            #[inline]
            fn slices_mut<'a>(columns: &'a mut Self::Columns) -> Self::SlicesMut<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.as_mut_slice(),)+)
            }

            #[inline]
            fn slices_len<'a>(slices: &Self::SlicesMut<'a>) -> usize
            where
                Self: 'a,
            {
                slices.0.len()
            }

            #[inline]
            fn split_first_mut<'a>(slices: &mut Self::SlicesMut<'a>) -> Option<Self::Muts<'a>>
            where
                Self: 'a,
            {
                if slices.0.is_empty() {
                    return None;
                }
                Some(($({
                    let slice = mem::take(&mut slices.$idx);
                    let (head, tail) = slice.split_first_mut()?;
                    slices.$idx = tail;
                    head
                },)+))
            }

            #[inline]
            fn split_last_mut<'a>(slices: &mut Self::SlicesMut<'a>) -> Option<Self::Muts<'a>>
            where
                Self: 'a,
            {
                if slices.0.is_empty() {
                    return None;
                }
                Some(($({
                    let slice = mem::take(&mut slices.$idx);
                    let (last, rest) = slice.split_last_mut()?;
                    slices.$idx = rest;
                    last
                },)+))
            }

            #[inline]
            fn advance_mut<'a>(slices: &mut Self::SlicesMut<'a>, n: usize)
            where
                Self: 'a,
            {
                $({
                    let slice = mem::take(&mut slices.$idx);
                    let mid = n.min(slice.len());
                    slices.$idx = slice.split_at_mut(mid).1;
                })+
            }

            #[inline]
            fn advance_back_mut<'a>(slices: &mut Self::SlicesMut<'a>, n: usize)
            where
                Self: 'a,
            {
                $({
                    let slice = mem::take(&mut slices.$idx);
                    let mid = slice.len() - n.min(slice.len());
                    slices.$idx = slice.split_at_mut(mid).0;
                })+
            }

            fn new_slot_columns() -> Self::SlotColumns {
                ($(SlotColumn::<$T>::new(),)+)
            }

            fn slot_grow(columns: &mut Self::SlotColumns, capacity: usize) {
                $( columns.$idx.grow(capacity); )+
            }

            #[inline]
            fn slot_put(columns: &mut Self::SlotColumns, slot: usize, row: Self) {
                $( columns.$idx.put(slot, row.$idx); )+
            }

            #[inline]
            fn slot_take(columns: &mut Self::SlotColumns, slot: usize) -> Option<Self> {
                let taken = ($(columns.$idx.take(slot),)+);
                Some(($(taken.$idx?,)+))
            }

            fn slot_clear(columns: &mut Self::SlotColumns) {
                $( columns.$idx.clear(); )+
            }

            fn slot_capacity(columns: &Self::SlotColumns) -> usize {
                usize::MAX $(.min(columns.$idx.capacity()))+
            }

            #[inline]
            fn slot_refs<'a>(columns: &'a Self::SlotColumns, slot: usize) -> Option<Self::Refs<'a>>
            where
                Self: 'a,
            {
                Some(($(columns.$idx.get(slot)?,)+))
            }

            #[inline]
            fn slot_muts<'a>(columns: &'a mut Self::SlotColumns, slot: usize) -> Option<Self::Muts<'a>>
            where
                Self: 'a,
            {
                Some(($(columns.$idx.get_mut(slot)?,)+))
            }

            #[inline]
            fn slot_slices<'a>(columns: &'a Self::SlotColumns) -> Self::SlotSlices<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.as_slice(),)+)
            }

            #[inline]
            fn slot_slices_mut<'a>(columns: &'a mut Self::SlotColumns) -> Self::SlotSlicesMut<'a>
            where
                Self: 'a,
            {
                ($(columns.$idx.as_mut_slice(),)+)
            }

            #[inline]
            fn slot_split_first<'a>(slices: &mut Self::SlotSlices<'a>) -> Option<Option<Self::Refs<'a>>>
            where
                Self: 'a,
            {
                if slices.0.is_empty() {
                    return None;
                }
                let heads = ($({
                    let slice = slices.$idx;
                    let (head, tail) = slice.split_first()?;
                    slices.$idx = tail;
                    head.as_ref()
                },)+);
                let row = 'row: {
                    Some(($(match heads.$idx {
                        Some(value) => value,
                        None => break 'row None,
                    },)+))
                };
                Some(row)
            }

            #[inline]
            fn slot_split_first_mut<'a>(
                slices: &mut Self::SlotSlicesMut<'a>,
            ) -> Option<Option<Self::Muts<'a>>>
            where
                Self: 'a,
            {
                if slices.0.is_empty() {
                    return None;
                }
                let heads = ($({
                    let slice = mem::take(&mut slices.$idx);
                    let (head, tail) = slice.split_first_mut()?;
                    slices.$idx = tail;
                    head.as_mut()
                },)+);
                let row = 'row: {
                    Some(($(match heads.$idx {
                        Some(value) => value,
                        None => break 'row None,
                    },)+))
                };
                Some(row)
            }
        }

        impl_layout!(@field [$($T),+] $($idx : $T),+);
    };
}

impl_layout!(1 => 0: T0);
impl_layout!(2 => 0: T0, 1: T1);
impl_layout!(3 => 0: T0, 1: T1, 2: T2);
impl_layout!(4 => 0: T0, 1: T1, 2: T2, 3: T3);
impl_layout!(5 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_layout!(6 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_layout!(7 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_layout!(8 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);
impl_layout!(9 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8);
impl_layout!(10 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9);
impl_layout!(11 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10);
impl_layout!(12 => 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11);
