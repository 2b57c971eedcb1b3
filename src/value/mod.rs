//! # Value Module
//!
//! Loosely-typed scalar values stored in table cells, and the coercion engine
//! that reconciles them with statically typed destinations.
//!
//! - [`Value`] is the closed set of scalars a cell may hold.
//! - [`rule`] holds the `(source, destination)` conversion table.
//! - [`coerce`] applies a rule, in lenient or strict mode.
//! - [`slot`] describes destinations of a statically known kind.
//! - [`format`] holds the read-side display coercion and boolean heuristic.
use chrono::{DateTime, FixedOffset};
use std::fmt::Display;

pub mod coerce;
pub mod format;
pub mod rule;
pub mod slot;

pub use coerce::{coerce, CoercionError, CoercionMode};
pub use slot::Slot;

/// Timestamp representation used by cells.
pub type Timestamp = DateTime<FixedOffset>;

/// Kind tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    I8,
    I16,
    I32,
    I64,
    ISize,
    U8,
    U16,
    U32,
    U64,
    USize,
    F32,
    F64,
    Bool,
    String,
    Bytes,
    Timestamp,
}

/// Broad family of a [`ValueKind`], the granularity of the conversion table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KindClass {
    Signed,
    Unsigned,
    Float,
    Bool,
    Text,
    Bytes,
    Timestamp,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 16] = [
        ValueKind::I8,
        ValueKind::I16,
        ValueKind::I32,
        ValueKind::I64,
        ValueKind::ISize,
        ValueKind::U8,
        ValueKind::U16,
        ValueKind::U32,
        ValueKind::U64,
        ValueKind::USize,
        ValueKind::F32,
        ValueKind::F64,
        ValueKind::Bool,
        ValueKind::String,
        ValueKind::Bytes,
        ValueKind::Timestamp,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::ISize => "isize",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::USize => "usize",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Bool => "bool",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Timestamp => "timestamp",
        }
    }

    pub const fn class(&self) -> KindClass {
        match self {
            ValueKind::I8 | ValueKind::I16 | ValueKind::I32 | ValueKind::I64 | ValueKind::ISize => {
                KindClass::Signed
            }
            ValueKind::U8 | ValueKind::U16 | ValueKind::U32 | ValueKind::U64 | ValueKind::USize => {
                KindClass::Unsigned
            }
            ValueKind::F32 | ValueKind::F64 => KindClass::Float,
            ValueKind::Bool => KindClass::Bool,
            ValueKind::String => KindClass::Text,
            ValueKind::Bytes => KindClass::Bytes,
            ValueKind::Timestamp => KindClass::Timestamp,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loosely-typed scalar held by a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    ISize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    USize(usize),
    F32(f32),
    F64(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(Timestamp),
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::I8(_) => ValueKind::I8,
            Value::I16(_) => ValueKind::I16,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::ISize(_) => ValueKind::ISize,
            Value::U8(_) => ValueKind::U8,
            Value::U16(_) => ValueKind::U16,
            Value::U32(_) => ValueKind::U32,
            Value::U64(_) => ValueKind::U64,
            Value::USize(_) => ValueKind::USize,
            Value::F32(_) => ValueKind::F32,
            Value::F64(_) => ValueKind::F64,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// The zero value of a kind: `0`, `false`, `""`, empty bytes or the Unix epoch.
    pub fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::I8 => Value::I8(0),
            ValueKind::I16 => Value::I16(0),
            ValueKind::I32 => Value::I32(0),
            ValueKind::I64 => Value::I64(0),
            ValueKind::ISize => Value::ISize(0),
            ValueKind::U8 => Value::U8(0),
            ValueKind::U16 => Value::U16(0),
            ValueKind::U32 => Value::U32(0),
            ValueKind::U64 => Value::U64(0),
            ValueKind::USize => Value::USize(0),
            ValueKind::F32 => Value::F32(0.0),
            ValueKind::F64 => Value::F64(0.0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::String => Value::String(String::new()),
            ValueKind::Bytes => Value::Bytes(Vec::new()),
            ValueKind::Timestamp => Value::Timestamp(format::zero_timestamp()),
        }
    }
}

impl Display for Value {
    /// Renders the value the way it is written into string destinations.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::I8(value) => write!(f, "{value}"),
            Value::I16(value) => write!(f, "{value}"),
            Value::I32(value) => write!(f, "{value}"),
            Value::I64(value) => write!(f, "{value}"),
            Value::ISize(value) => write!(f, "{value}"),
            Value::U8(value) => write!(f, "{value}"),
            Value::U16(value) => write!(f, "{value}"),
            Value::U32(value) => write!(f, "{value}"),
            Value::U64(value) => write!(f, "{value}"),
            Value::USize(value) => write!(f, "{value}"),
            Value::F32(value) => write!(f, "{:.*}", format::FLOAT_PRECISION, value),
            Value::F64(value) => write!(f, "{:.*}", format::FLOAT_PRECISION, value),
            Value::Bool(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Bytes(value) => f.write_str(&String::from_utf8_lossy(value)),
            Value::Timestamp(value) => f.write_str(&format::format_timestamp(value)),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => ISize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => USize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => String,
    Vec<u8> => Bytes,
    Timestamp => Timestamp,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        for kind in ValueKind::ALL {
            assert_eq!(Value::zero(kind).kind(), kind);
        }
    }

    #[test]
    fn display_renders_floats_fixed_point() {
        assert_eq!(Value::F64(3.14).to_string(), "3.140000");
        assert_eq!(Value::F32(-0.5).to_string(), "-0.500000");
        assert_eq!(Value::I64(-42).to_string(), "-42");
        assert_eq!(Value::Bytes(b"abc".to_vec()).to_string(), "abc");
    }
}
