//! Dense generational index: the mapping between [`RowId`]s and row indices.
//!
//! # Layout
//!
//! Two arrays, both exactly `capacity` long:
//!
//! - `slots[s]` — for slot `s`, the generation currently stamped on it and,
//!   while occupied, the dense row index of its row.
//! - `ids[i]`   — for `i < len`, the id of the row at index `i`; for
//!   `i >= len`, the pool of free (vacant) ids.  The next insert takes
//!   `ids[len]`, so freed slots are recycled most-recent-first.
//!
//! Removal mirrors the table's swap-erase: the last row's id moves into the
//! freed index and the freed id is parked just past the new end.

use soa_core::RowId;

#[derive(Copy, Clone, Debug)]
struct Slot {
    generation: u32,
    index: u32,
}

#[derive(Clone, Default)]
pub(crate) struct Index {
    slots: Vec<Slot>,
    ids: Vec<RowId>,
    len: usize,
}

impl Index {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.ids.len()
    }

    /// Extend both arrays to `capacity` fresh vacant slots.  No-op when
    /// already large enough.
    pub(crate) fn grow(&mut self, capacity: usize) {
        let old = self.capacity();
        if capacity <= old {
            return;
        }
        let vacant = RowId::vacant(0).generation();
        self.slots.reserve_exact(capacity - old);
        self.ids.reserve_exact(capacity - old);
        for slot in old..capacity {
            // Callers cap capacity at MAX_ROWS, so every slot fits in a u32.
            let slot = slot as u32;
            self.slots.push(Slot {
                generation: vacant,
                index: slot,
            });
            self.ids.push(RowId::vacant(slot));
        }
    }

    /// Claim a free slot for a row appended at index `len`.
    ///
    /// # Panics
    ///
    /// If there is no spare capacity; the table grows the index first.
    pub(crate) fn push(&mut self) -> RowId {
        assert!(self.len < self.capacity(), "index has no spare capacity");
        let id = self.ids[self.len].occupied();
        self.ids[self.len] = id;
        self.slots[id.slot_index()] = Slot {
            generation: id.generation(),
            index: self.len as u32,
        };
        self.len += 1;
        id
    }

    /// Dense index of the row `id` names, or `None` if the row is gone.
    #[inline]
    pub(crate) fn position(&self, id: RowId) -> Option<usize> {
        let slot = self.slots.get(id.slot_index())?;
        (slot.generation == id.generation() && !id.is_vacant()).then_some(slot.index as usize)
    }

    #[inline]
    pub(crate) fn id_at(&self, index: usize) -> RowId {
        debug_assert!(index < self.len);
        self.ids[index]
    }

    /// Live ids in row order.
    #[inline]
    pub(crate) fn live_ids(&self) -> &[RowId] {
        &self.ids[..self.len]
    }

    /// Free `id`'s slot, returning the row index it occupied.
    ///
    /// After this call the row that was last now lives at the returned index,
    /// which is exactly what a swap-erase of the columns produces.  Returns
    /// `None` (and changes nothing) for a stale or foreign id.
    pub(crate) fn remove(&mut self, id: RowId) -> Option<usize> {
        let index = self.position(id)?;
        let last = self.len - 1;

        let moved = self.ids[last];
        self.slots[moved.slot_index()].index = index as u32;

        let vacated = id.vacated();
        self.slots[id.slot_index()].generation = vacated.generation();
        self.ids[index] = vacated;
        self.ids.swap(index, last);

        self.len = last;
        Some(index)
    }

    /// Free the row at dense `index`, returning its id.
    pub(crate) fn remove_at(&mut self, index: usize) -> RowId {
        let id = self.id_at(index);
        let removed = self.remove(id);
        debug_assert_eq!(removed, Some(index));
        id
    }

    /// Vacate every live slot, invalidating all outstanding ids.  Capacity is
    /// kept.
    pub(crate) fn clear(&mut self) {
        for index in 0..self.len {
            let vacated = self.ids[index].vacated();
            self.slots[vacated.slot_index()].generation = vacated.generation();
            self.ids[index] = vacated;
        }
        self.len = 0;
    }
}

/// Slot index for a [`SparseTable`](crate::SparseTable): one generation per
/// slot plus a stack of free slots.
///
/// Rows never move, so a live id's slot *is* its storage position.
/// `free[len..]` is the stack of unused slots with its top at `free[len]`:
/// a removal parks the freed slot there and the next insert takes it back.
/// Growing appends the new slots beneath the existing free ones, so
/// recently freed slots are always reused before fresh ones.
#[derive(Clone, Default)]
pub(crate) struct SlotIndex {
    generations: Vec<u32>,
    free: Vec<u32>,
    len: usize,
}

impl SlotIndex {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.generations.len()
    }

    pub(crate) fn grow(&mut self, capacity: usize) {
        let old = self.capacity();
        if capacity <= old {
            return;
        }
        let vacant = RowId::vacant(0).generation();
        self.generations.reserve_exact(capacity - old);
        self.free.reserve_exact(capacity - old);
        for slot in old..capacity {
            self.generations.push(vacant);
            // Callers cap capacity at MAX_ROWS, so every slot fits in a u32.
            self.free.push(slot as u32);
        }
    }

    /// Pop a free slot and mark it live.
    ///
    /// # Panics
    ///
    /// If every slot is taken; the table grows the index first.
    pub(crate) fn push(&mut self) -> RowId {
        assert!(self.len < self.capacity(), "slot index has no spare capacity");
        let slot = self.free[self.len];
        let id = RowId::new(slot, self.generations[slot as usize]).occupied();
        self.generations[slot as usize] = id.generation();
        self.len += 1;
        id
    }

    /// Slot of the row `id` names, or `None` if the row is gone.
    #[inline]
    pub(crate) fn resolve(&self, id: RowId) -> Option<usize> {
        let generation = *self.generations.get(id.slot_index())?;
        (generation == id.generation() && !id.is_vacant()).then_some(id.slot_index())
    }

    /// Free `id`'s slot, returning it.  `None` (and no change) for a stale
    /// or foreign id.
    pub(crate) fn remove(&mut self, id: RowId) -> Option<usize> {
        let slot = self.resolve(id)?;
        self.generations[slot] = id.vacated().generation();
        self.len -= 1;
        self.free[self.len] = id.slot();
        Some(slot)
    }

    /// Id of the live row in `slot`, if any.
    #[inline]
    pub(crate) fn id_in(&self, slot: usize) -> Option<RowId> {
        let id = RowId::new(slot as u32, *self.generations.get(slot)?);
        (!id.is_vacant()).then_some(id)
    }

    /// Per-slot generations, for sequences that walk every slot.
    #[inline]
    pub(crate) fn generations(&self) -> &[u32] {
        &self.generations
    }

    /// Vacate every live slot, invalidating all outstanding ids.
    pub(crate) fn clear(&mut self) {
        for slot in 0..self.capacity() {
            if let Some(id) = self.id_in(slot) {
                self.generations[slot] = id.vacated().generation();
                self.len -= 1;
                self.free[self.len] = id.slot();
            }
        }
        debug_assert_eq!(self.len, 0);
    }
}
