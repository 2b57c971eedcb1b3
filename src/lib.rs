//! # DataTable
//!
//! An in-memory table of rows and columns for query results or ad-hoc
//! structured data, with typed accessors that coerce loosely-typed cell values
//! into statically typed destinations.
//!
//! ## Features
//!
//! - **Column layout**: columns with a logical type, declared length and
//!   optional origin type; names are unique ignoring case
//! - **Row templates**: `new_row` stamps a row matching the current layout,
//!   `add_row`/`add_rows` store independent copies
//! - **Lookup**: by ordinal or by case-insensitive name
//! - **Coercion**: numeric widening/narrowing, text rendering and parsing,
//!   boolean heuristics and RFC 3339 timestamps, driven by one conversion table
//! - **Strict mode**: `try_set_value` reports parse failures and overflows
//! - **Row sources**: a row can stream records from a database cursor, with
//!   decimal text parsed to `f64` and binary payloads left untouched
//!
//! ## Example
//!
//! ```
//! use datatable::{ColumnType, Table};
//!
//! let mut table = Table::new("T");
//! table.add_column("ID", ColumnType::BigInt, 0, None);
//! table.add_column("Code", ColumnType::Varchar, 12, None);
//!
//! let mut row = table.new_row();
//! row.set("id", 1i64);
//! row.set("code", "A1");
//! table.add_row(&row);
//!
//! let mut id = String::new();
//! table.rows()[0].set_value(&mut id, "ID");
//! assert_eq!(id, "1");
//! assert_eq!(table.rows()[0].value_string("CODE").unwrap(), "A1");
//! ```
pub mod database;
pub mod error;
pub mod value;

pub use crate::database::cell::Cell;
pub use crate::database::column::{Column, ColumnError, ColumnType};
#[cfg(feature = "duckdb")]
pub use crate::database::duckdb_source::DuckDbSource;
pub use crate::database::origin::OriginType;
pub use crate::database::row::{Key, Row};
pub use crate::database::source::{MemorySource, RowSource, ScanError};
pub use crate::database::table::Table;
pub use crate::error::{DataTableError, Result};
pub use crate::value::{coerce, CoercionError, CoercionMode, Slot, Timestamp, Value, ValueKind};
