//! Table error type.
//!
//! Every runtime precondition failure of a table operation is reported as a
//! `TableError`.  Allocation failure is not represented here: the global
//! allocator aborts, and there is no reduced-capacity fallback.

use thiserror::Error;

use crate::RowId;

/// The error type shared by `soa-core` and `soa-table`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row index {index} out of range for table of length {len}")]
    RowOutOfRange { index: usize, len: usize },

    #[error("{0} does not refer to a live row")]
    StaleId(RowId),

    #[error("configuration error: {0}")]
    Config(String),
}

impl TableError {
    /// Shorthand used by every bounds check in `soa-table`.
    #[inline]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        TableError::RowOutOfRange { index, len }
    }
}

/// Shorthand result type for all `soa-*` crates.
pub type TableResult<T> = Result<T, TableError>;
