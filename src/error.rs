use crate::value::ValueKind;
use thiserror::Error;

/// Main error type of the crate.
/// Aggregates the errors of the column, value and row source modules.
#[derive(Error, Debug)]
pub enum DataTableError {
    /// A typed accessor met a stored value of another kind
    #[error("Column '{key}' holds {actual}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("{0}")]
    ColumnError(#[from] crate::database::column::ColumnError),

    #[error("{0}")]
    CoercionError(#[from] crate::value::CoercionError),

    #[error("{0}")]
    ScanError(#[from] crate::database::source::ScanError),
}

pub type Result<T, E = DataTableError> = std::result::Result<T, E>;
