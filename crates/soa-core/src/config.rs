//! Growth configuration: how large a table starts and how fast it grows.
//!
//! # Growth model
//!
//! A table grows only when a request exceeds its current capacity.  The new
//! capacity is
//!
//! ```text
//! new_capacity = max(requested, current * growth_factor)
//! ```
//!
//! which keeps the number of reallocations over `n` single-row inserts at
//! `O(log n)`.  Every column of a table is grown to the same capacity in the
//! same step.

use crate::{MAX_ROWS, TableError, TableResult};

/// Largest accepted `growth_factor`.  Beyond this a couple of growth steps
/// would jump straight to `MAX_ROWS`-sized allocations.
pub const MAX_GROWTH_FACTOR: u32 = 16;

/// Capacity settings for one table.
///
/// Typically built in code, but can be loaded from a TOML/JSON file by the
/// application crate when the `serde` feature is on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Rows to allocate room for up front.  Default: 0 (no allocation until
    /// the first insert).
    pub initial_capacity: usize,

    /// Geometric growth multiplier, in `2..=MAX_GROWTH_FACTOR`.  Default: 2.
    pub growth_factor: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth_factor: 2,
        }
    }
}

impl TableConfig {
    /// Check that the configuration describes a table that can exist.
    pub fn validate(&self) -> TableResult<()> {
        if !(2..=MAX_GROWTH_FACTOR).contains(&self.growth_factor) {
            return Err(TableError::Config(format!(
                "growth_factor must be between 2 and {MAX_GROWTH_FACTOR}, got {}",
                self.growth_factor
            )));
        }
        if self.initial_capacity > MAX_ROWS {
            return Err(TableError::Config(format!(
                "initial_capacity {} exceeds the maximum of {MAX_ROWS} rows",
                self.initial_capacity
            )));
        }
        Ok(())
    }

    /// Capacity to grow to when `requested` rows must fit and `current` is
    /// the present capacity.
    ///
    /// Returns `current` unchanged when it already suffices.  The result is
    /// clamped to [`MAX_ROWS`]; a `requested` above that is the caller's
    /// problem to reject.
    #[inline]
    pub fn next_capacity(&self, current: usize, requested: usize) -> usize {
        if requested <= current {
            return current;
        }
        let geometric = current.saturating_mul(self.growth_factor as usize);
        requested.max(geometric).min(MAX_ROWS)
    }
}
