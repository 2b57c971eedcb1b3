use crate::database::origin::OriginType;
use crate::value::format::display;
use crate::value::Value;

/// One value slot at a (row, column) position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Name of the column this cell belongs to
    pub(crate) column_name: String,
    /// Position within the owning row (0-based)
    pub(crate) column_index: usize,
    /// Position of the owning row within its table (0-based)
    pub(crate) row_index: usize,
    /// Source-side type label copied from the column or row source
    pub(crate) origin_type: Option<String>,
    /// Classification of `origin_type`, fixed when the cell is created
    pub(crate) origin: OriginType,
    /// Stored value, `None` when absent
    pub value: Option<Value>,
}

impl Cell {
    pub(crate) fn new(column_name: &str, column_index: usize, origin_type: Option<&str>) -> Self {
        Self {
            column_name: column_name.to_owned(),
            column_index,
            row_index: 0,
            origin_type: origin_type.map(str::to_owned),
            origin: OriginType::of(origin_type),
            value: None,
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn origin_type(&self) -> Option<&str> {
        self.origin_type.as_deref()
    }

    pub fn origin(&self) -> OriginType {
        self.origin
    }

    /// Returns true if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Stored value after read-side display coercion.
    pub fn display_value(&self) -> Option<Value> {
        self.value.as_ref().map(|value| display(value, self.origin))
    }
}
