use thiserror::Error;

/// Errors related to column type parsing.
#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("Invalid column type '{0}'")]
    TypeError(String),
}

/// Logical type of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 8-bit signed integers
    TinyInt,
    /// 16-bit signed integers
    SmallInt,
    /// 32-bit signed integers
    Integer,
    /// 64-bit signed integers
    BigInt,
    /// Unsigned 8-bit integers
    UTinyInt,
    /// Unsigned 16-bit integers
    USmallInt,
    /// Unsigned 32-bit integers
    UInteger,
    /// Unsigned 64-bit integers
    UBigInt,
    /// Single-precision floating point numbers
    Float,
    /// Double-precision floating point numbers
    Double,
    /// Variable-length strings
    Varchar,
    /// Raw byte sequences
    Blob,
    /// Date and time with an offset
    Timestamp,
}

impl ColumnType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::TinyInt => "tinyint",
            ColumnType::SmallInt => "smallint",
            ColumnType::Integer => "integer",
            ColumnType::BigInt => "bigint",
            ColumnType::UTinyInt => "utinyint",
            ColumnType::USmallInt => "usmallint",
            ColumnType::UInteger => "uinteger",
            ColumnType::UBigInt => "ubigint",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Varchar => "varchar",
            ColumnType::Blob => "blob",
            ColumnType::Timestamp => "timestamp",
        }
    }

    /// Parses a column type from a string representation.
    /// Supports various aliases for each type.
    pub fn parse(name: &str) -> Result<Self, ColumnError> {
        match name.trim().to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" | "BIT" => Ok(Self::Boolean),
            "TINYINT" | "INT1" => Ok(Self::TinyInt),
            "SMALLINT" | "INT2" => Ok(Self::SmallInt),
            "INT" | "INTEGER" | "INT4" => Ok(Self::Integer),
            "BIGINT" | "INT8" | "LONG" => Ok(Self::BigInt),
            "UTINYINT" | "BYTE" => Ok(Self::UTinyInt),
            "USMALLINT" => Ok(Self::USmallInt),
            "UINTEGER" | "UINT" => Ok(Self::UInteger),
            "UBIGINT" => Ok(Self::UBigInt),
            "FLOAT" | "REAL" | "FLOAT4" => Ok(Self::Float),
            "DOUBLE" | "FLOAT8" | "DECIMAL" | "NUMERIC" => Ok(Self::Double),
            "TEXT" | "STRING" | "VARCHAR" | "CHAR" => Ok(Self::Varchar),
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => Ok(Self::Blob),
            "DATETIME" | "TIMESTAMP" | "TIMESTAMPTZ" => Ok(Self::Timestamp),
            _ => Err(ColumnError::TypeError(name.to_string())),
        }
    }
}

impl TryFrom<&str> for ColumnType {
    type Error = ColumnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Describes one column of a table.
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name, unique within a table ignoring case
    pub name: String,
    /// Logical column type
    pub kind: ColumnType,
    /// Declared length, 0 when not applicable
    pub length: usize,
    /// Source-side type label, e.g. a driver-reported column type
    pub origin_type: Option<String>,
}

impl Column {
    pub fn new(name: &str, kind: ColumnType, length: usize) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            length,
            origin_type: None,
        }
    }

    pub fn with_origin_type(mut self, origin_type: &str) -> Self {
        self.origin_type = Some(origin_type.to_owned());
        self
    }

    /// Column identity: the name, compared ignoring case.
    pub fn same_name(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.same_name(&other.name)
    }
}

/// Case-insensitive name comparison used for columns and cells.
pub(crate) fn same_name(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right) || fold_name(left) == fold_name(right)
}

/// Key under which a name is stored in a row's name index.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!(ColumnType::parse("int").unwrap(), ColumnType::Integer);
        assert_eq!(ColumnType::parse("Varchar").unwrap(), ColumnType::Varchar);
        assert_eq!(ColumnType::parse("decimal").unwrap(), ColumnType::Double);
        assert_eq!(ColumnType::parse(" bool ").unwrap(), ColumnType::Boolean);
        assert_eq!(ColumnType::try_from("timestamptz").unwrap(), ColumnType::Timestamp);
        assert!(ColumnType::parse("struct").is_err());
    }

    #[test]
    fn columns_compare_by_name_ignoring_case() {
        let code = Column::new("Code", ColumnType::Varchar, 12);
        assert_eq!(code, Column::new("CODE", ColumnType::Integer, 0));
        assert_ne!(code, Column::new("Name", ColumnType::Varchar, 12));
        assert!(code.same_name("code"));
    }
}
