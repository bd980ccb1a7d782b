//! Single-field column storage.
//!
//! # Design
//!
//! A `Column<T>` owns one field's values for every row as a contiguous
//! `Vec<T>`.  It knows nothing about the other columns of its table and does
//! no bounds reporting of its own: the owning [`Table`](crate::Table) checks
//! every index before it reaches a column, so an out-of-range index here is a
//! bug in this crate and panics.
//!
//! Capacity is driven from outside.  The table calls [`Column::reserve`] with
//! the same target on every column, so all columns of one table always have
//! room for the same number of rows and [`Column::append`] never reallocates
//! on the table's insert path.

use std::mem;

/// Contiguous storage for one field across all rows of a table.
///
/// Only reachable through a table's `Layout`; callers see slices, never the
/// column itself.
pub struct Column<T> {
    data: Vec<T>,
}

impl<T> Column<T> {
    pub(crate) const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Guarantee physical room for at least `capacity` elements.
    ///
    /// No-op if already sufficient.  Existing elements keep their order and
    /// indices across the reallocation.
    pub(crate) fn reserve(&mut self, capacity: usize) {
        if capacity > self.data.capacity() {
            self.data.reserve_exact(capacity - self.data.len());
        }
    }

    /// Append `value`, returning its index (the pre-append length).
    #[inline]
    pub(crate) fn append(&mut self, value: T) -> usize {
        let index = self.data.len();
        self.data.push(value);
        index
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> &T {
        debug_assert!(index < self.data.len());
        &self.data[index]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.data.len());
        &mut self.data[index]
    }

    /// Overwrite the value at `index`, returning the old one.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: T) -> T {
        mem::replace(self.get_mut(index), value)
    }

    /// Swap-erase: the last element moves into `index`.
    #[inline]
    pub(crate) fn erase(&mut self, index: usize) -> T {
        debug_assert!(index < self.data.len());
        self.data.swap_remove(index)
    }

    /// Drop every element; capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Clone> Clone for Column<T> {
    /// Clones the values and the reserved headroom, so a cloned table has the
    /// same capacity as its source.
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.capacity());
        data.extend_from_slice(&self.data);
        Self { data }
    }
}

/// Slot-addressed storage for one field of a [`SparseTable`](crate::SparseTable).
///
/// Unlike [`Column`], values never move: a row keeps its slot from insert to
/// removal, and a removed row leaves a `None` hole that the next insert may
/// fill.  The vector is always exactly as long as the table's slot capacity.
pub struct SlotColumn<T> {
    slots: Vec<Option<T>>,
}

impl<T> SlotColumn<T> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Extend with empty slots up to `capacity`.  Occupied slots keep their
    /// positions.
    pub(crate) fn grow(&mut self, capacity: usize) {
        if capacity <= self.slots.len() {
            return;
        }
        self.slots.reserve_exact(capacity - self.slots.len());
        self.slots.resize_with(capacity, || None);
    }

    /// Store `value` in the empty slot `slot`.
    #[inline]
    pub(crate) fn put(&mut self, slot: usize, value: T) {
        debug_assert!(self.slots[slot].is_none(), "slot {slot} is occupied");
        self.slots[slot] = Some(value);
    }

    #[inline]
    pub(crate) fn take(&mut self, slot: usize) -> Option<T> {
        self.slots.get_mut(slot)?.take()
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot)?.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Drop every value; the slots themselves are kept.
    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[Option<T>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Option<T>] {
        &mut self.slots
    }
}

impl<T: Clone> Clone for SlotColumn<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}
