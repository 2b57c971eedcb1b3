//! # Table Module
//!
//! Columns, cells, rows and the table that owns them, plus the row source
//! contract used to stream records into a row.
pub mod cell;
pub mod column;
#[cfg(feature = "duckdb")]
pub mod duckdb_source;
pub mod origin;
pub mod row;
pub mod source;
pub mod table;
