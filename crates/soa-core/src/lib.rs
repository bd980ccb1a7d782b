//! `soa-core` — foundational types for the `soa` columnar table.
//!
//! This crate is a dependency of `soa-table`.  It intentionally has no
//! `soa-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RowId` (generational row handle), `MAX_ROWS`         |
//! | [`config`]      | `TableConfig`, `MAX_GROWTH_FACTOR`                    |
//! | [`error`]       | `TableError`, `TableResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `TableConfig`.           |

pub mod config;
pub mod error;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MAX_GROWTH_FACTOR, TableConfig};
pub use error::{TableError, TableResult};
pub use ids::{MAX_ROWS, RowId};
