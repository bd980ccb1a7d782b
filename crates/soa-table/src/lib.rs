//! `soa-table` — a Structure-of-Arrays table for the `soa` workspace.
//!
//! A [`Table<L>`] stores a sequence of rows shaped like the tuple `L`, but
//! keeps each tuple field in its own contiguous column.  Scans that touch one
//! field read one dense array; row-oriented code still sees rows through
//! [`RowRef`] / [`RowMut`] views.
//!
//! ```rust
//! use soa_table::Table;
//!
//! let mut particles: Table<(f32, f32, &str)> = Table::with_capacity(3);
//! particles.emplace_row((0.0, 1.0, "a"));
//! let id = particles.insert((5.0, -1.0, "b"));
//!
//! // Column-wise: integrate positions from velocities in one pass.
//! let (pos, vel, _) = particles.columns_mut();
//! for (p, v) in pos.iter_mut().zip(vel.iter()) {
//!     *p += *v;
//! }
//!
//! // Row-wise: the row behind `id`, wherever it currently sits.
//! let row = particles.get(id).unwrap();
//! assert_eq!(row.get(), (&4.0, &-1.0, &"b"));
//! ```
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`layout`]      | `Layout` (tuple shapes), `Field<I>` (positional fields)   |
//! | [`table`]       | `Table` (columns + id index, growth, insert/erase)        |
//! | [`view`]        | `RowRef`, `RowMut`                                        |
//! | [`iter`]        | `Rows`, `RowsMut`                                         |
//! | [`sparse`]      | `SparseTable` (slot-stable rows, hole-leaving removal)    |
//! | [`builder`]     | `TableBuilder` (validated construction)                   |
//!
//! # Guarantees
//!
//! - Every column of a [`Table`] always holds exactly `len()` values and
//!   has room for `capacity()`; every column of a [`SparseTable`] has exactly
//!   `capacity()` slots.
//! - Growth is geometric (×2 by default) and applied to every column in one
//!   step, so `n` single-row inserts reallocate `O(log n)` times.
//! - [`Table`] removal is swap-erase: O(1), does not preserve row order.
//!   [`SparseTable`] removal leaves a hole: O(1), no other row moves.
//! - Views and sequences borrow the table; anything that can move rows
//!   needs `&mut Table`, so stale views are compile errors.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `serde`    | Derives `Serialize`/`Deserialize` on `TableConfig`.        |

pub mod builder;
mod column;
mod index;
pub mod iter;
pub mod layout;
pub mod sparse;
pub mod table;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::TableBuilder;
pub use iter::{Rows, RowsMut};
pub use layout::{Field, Layout};
pub use sparse::{ColumnSlots, ColumnSlotsMut, SparseRows, SparseRowsMut, SparseTable};
pub use table::Table;
pub use view::{RowMut, RowRef};

pub use soa_core::{MAX_GROWTH_FACTOR, MAX_ROWS, RowId, TableConfig, TableError, TableResult};
