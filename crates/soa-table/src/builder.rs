//! Fluent builder for constructing a `Table` with a non-default growth policy.
//!
//! # Usage
//!
//! ```rust
//! use soa_table::{Table, TableBuilder};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! let mut table: Table<(u64, Velocity)> = TableBuilder::new()
//!     .initial_capacity(10_000)
//!     .growth_factor(4)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.capacity(), 10_000);
//! table.emplace_row((7, Velocity { dx: 1.0, dy: 0.0 }));
//! assert_eq!(table.len(), 1);
//! ```

use std::marker::PhantomData;

use soa_core::{TableConfig, TableResult};
use tracing::debug;

use crate::{Layout, SparseTable, Table};

/// Fluent builder for [`Table`].
///
/// All settings are validated once, in [`build`](Self::build); the initial
/// allocation happens there too, so a bulk load into the returned table does
/// no reallocation until it passes `initial_capacity` rows.
pub struct TableBuilder<L: Layout> {
    config: TableConfig,
    layout: PhantomData<fn() -> L>,
}

impl<L: Layout> TableBuilder<L> {
    /// Start from [`TableConfig::default`]: no initial allocation, doubling.
    pub fn new() -> Self {
        Self::from_config(TableConfig::default())
    }

    /// Start from an existing config (e.g. one deserialized from a file).
    pub fn from_config(config: TableConfig) -> Self {
        Self {
            config,
            layout: PhantomData,
        }
    }

    /// Rows to allocate room for before the first insert.
    pub fn initial_capacity(mut self, rows: usize) -> Self {
        self.config.initial_capacity = rows;
        self
    }

    /// Multiplier applied to the capacity each time the table grows.  Must be
    /// in `2..=MAX_GROWTH_FACTOR`.
    pub fn growth_factor(mut self, factor: u32) -> Self {
        self.config.growth_factor = factor;
        self
    }

    /// Validate the config and construct the table.
    ///
    /// # Errors
    ///
    /// [`TableError::Config`](soa_core::TableError::Config) if the growth
    /// factor is outside `2..=`[`MAX_GROWTH_FACTOR`](soa_core::MAX_GROWTH_FACTOR)
    /// or the initial capacity exceeds
    /// [`MAX_ROWS`](soa_core::MAX_ROWS).
    pub fn build(self) -> TableResult<Table<L>> {
        self.config.validate()?;
        debug!(
            arity = L::ARITY,
            initial_capacity = self.config.initial_capacity,
            growth_factor = self.config.growth_factor,
            "building table"
        );
        Ok(Table::from_config(self.config))
    }

    /// Validate the config and construct a [`SparseTable`] instead.
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build).
    pub fn build_sparse(self) -> TableResult<SparseTable<L>> {
        self.config.validate()?;
        debug!(
            arity = L::ARITY,
            initial_capacity = self.config.initial_capacity,
            growth_factor = self.config.growth_factor,
            "building sparse table"
        );
        Ok(SparseTable::from_config(self.config))
    }
}

impl<L: Layout> Default for TableBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}
