//! Generational row handles.
//!
//! A [`RowId`] names a row independently of where that row currently sits in
//! the table.  Row *indices* change whenever a swap-erase moves the last row
//! into a freed position; a `RowId` does not.  It packs two `u32`s into one
//! `u64`:
//!
//! ```text
//!  63            32 31             0
//! +----------------+----------------+
//! |   generation   |      slot      |
//! +----------------+----------------+
//! ```
//!
//! Odd generations mark a vacant slot, even generations a live row.  Both an
//! insert and a removal bump the generation by one, so an id handed out for a
//! removed row never matches whatever later occupies the same slot.

use std::fmt;

/// Largest row count a table can hold.  Slots are `u32`, and `u32::MAX` is
/// reserved for [`RowId::INVALID`].
pub const MAX_ROWS: usize = u32::MAX as usize;

const SLOT_MASK: u64 = u32::MAX as u64;

/// Generation of a slot that has never held a row.
const FIRST_VACANT_GENERATION: u32 = 1;

/// Stable handle to one row of a table.
///
/// Produced by `Table::insert`; resolved back to a row index with
/// `Table::position`.  `Copy + Ord + Hash` so it can key maps and sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct RowId(u64);

impl RowId {
    /// Sentinel meaning "no row".  Its generation is odd, so it is vacant and
    /// never resolves.
    pub const INVALID: RowId = RowId(u64::MAX);

    #[inline(always)]
    pub const fn new(slot: u32, generation: u32) -> Self {
        RowId(((generation as u64) << 32) | slot as u64)
    }

    /// A never-used slot.
    #[inline(always)]
    pub const fn vacant(slot: u32) -> Self {
        Self::new(slot, FIRST_VACANT_GENERATION)
    }

    #[inline(always)]
    pub const fn slot(self) -> u32 {
        (self.0 & SLOT_MASK) as u32
    }

    /// Slot cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub const fn slot_index(self) -> usize {
        self.slot() as usize
    }

    #[inline(always)]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// `true` if this id names a slot with no live row.
    #[inline(always)]
    pub const fn is_vacant(self) -> bool {
        self.generation() & 1 == 1
    }

    /// The id the slot takes when a row moves into it.
    #[inline]
    pub fn occupied(self) -> Self {
        debug_assert!(self.is_vacant(), "{self} is already occupied");
        self.next_generation()
    }

    /// The id the slot takes when its row is removed.
    #[inline]
    pub fn vacated(self) -> Self {
        debug_assert!(!self.is_vacant(), "{self} is already vacant");
        self.next_generation()
    }

    #[inline(always)]
    fn next_generation(self) -> Self {
        Self::new(self.slot(), self.generation().wrapping_add(1))
    }

    /// The raw packed value.
    #[inline(always)]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl Default for RowId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            return f.write_str("RowId(INVALID)");
        }
        write!(f, "RowId({}@{})", self.slot(), self.generation())
    }
}

impl From<RowId> for u64 {
    #[inline(always)]
    fn from(id: RowId) -> u64 {
        id.0
    }
}
