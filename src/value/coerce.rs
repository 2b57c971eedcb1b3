use crate::value::format::{is_true_token, is_truthy_number, parse_timestamp};
use crate::value::rule::Rule;
use crate::value::{Value, ValueKind};
use log::debug;
use thiserror::Error;

/// Errors raised while converting a value to a destination kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    #[error("No cell matches '{0}'")]
    LookupMiss(String),

    #[error("Cannot convert {from} to {to}")]
    Unsupported { from: ValueKind, to: ValueKind },

    #[error("Parse '{text}' to {to} failed")]
    ParseFailure { text: String, to: ValueKind },

    #[error("Value {value} overflows {to}")]
    Overflow { value: String, to: ValueKind },
}

/// How permissive a conversion is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CoercionMode {
    /// Parse failures give the zero value and numeric casts wrap or saturate.
    #[default]
    Lenient,
    /// Parse failures and out-of-range numbers are errors.
    Strict,
}

/// Intermediate numeric form shared by every numeric conversion.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Number> {
        match *value {
            Value::I8(value) => Some(Number::Int(value as i128)),
            Value::I16(value) => Some(Number::Int(value as i128)),
            Value::I32(value) => Some(Number::Int(value as i128)),
            Value::I64(value) => Some(Number::Int(value as i128)),
            Value::ISize(value) => Some(Number::Int(value as i128)),
            Value::U8(value) => Some(Number::Int(value as i128)),
            Value::U16(value) => Some(Number::Int(value as i128)),
            Value::U32(value) => Some(Number::Int(value as i128)),
            Value::U64(value) => Some(Number::Int(value as i128)),
            Value::USize(value) => Some(Number::Int(value as i128)),
            Value::F32(value) => Some(Number::Float(value as f64)),
            Value::F64(value) => Some(Number::Float(value)),
            Value::Bool(value) => Some(Number::Int(value as i128)),
            _ => None,
        }
    }

    /// Parses a decimal literal, preferring an exact integer reading.
    fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        text.parse::<i128>()
            .map(Number::Int)
            .or_else(|_| text.parse::<f64>().map(Number::Float))
            .ok()
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    fn render(&self) -> String {
        match self {
            Number::Int(value) => value.to_string(),
            Number::Float(value) => value.to_string(),
        }
    }
}

fn overflow(number: Number, to: ValueKind) -> CoercionError {
    CoercionError::Overflow {
        value: number.render(),
        to,
    }
}

/// Casts to an integer kind: `as` semantics when lenient, range checked when strict.
macro_rules! cast_integer {
    ($number:expr, $mode:expr, $to:expr, $target:ty, $variant:ident) => {
        match ($number, $mode) {
            (Number::Int(value), CoercionMode::Lenient) => Ok(Value::$variant(value as $target)),
            (Number::Float(value), CoercionMode::Lenient) => Ok(Value::$variant(value as $target)),
            (Number::Int(value), CoercionMode::Strict) => <$target>::try_from(value)
                .map(Value::$variant)
                .map_err(|_| overflow($number, $to)),
            // Floats past the i128 range saturate, which no target accepts.
            (Number::Float(value), CoercionMode::Strict) if value.is_finite() => {
                <$target>::try_from(value.trunc() as i128)
                    .map(Value::$variant)
                    .map_err(|_| overflow($number, $to))
            }
            (Number::Float(_), CoercionMode::Strict) => Err(overflow($number, $to)),
        }
    };
}

fn cast(number: Number, to: ValueKind, mode: CoercionMode) -> Result<Value, CoercionError> {
    match to {
        ValueKind::I8 => cast_integer!(number, mode, to, i8, I8),
        ValueKind::I16 => cast_integer!(number, mode, to, i16, I16),
        ValueKind::I32 => cast_integer!(number, mode, to, i32, I32),
        ValueKind::I64 => cast_integer!(number, mode, to, i64, I64),
        ValueKind::ISize => cast_integer!(number, mode, to, isize, ISize),
        ValueKind::U8 => cast_integer!(number, mode, to, u8, U8),
        ValueKind::U16 => cast_integer!(number, mode, to, u16, U16),
        ValueKind::U32 => cast_integer!(number, mode, to, u32, U32),
        ValueKind::U64 => cast_integer!(number, mode, to, u64, U64),
        ValueKind::USize => cast_integer!(number, mode, to, usize, USize),
        ValueKind::F32 => {
            let value = number.as_f64();
            let narrowed = value as f32;
            if mode == CoercionMode::Strict && value.is_finite() && narrowed.is_infinite() {
                Err(overflow(number, to))
            } else {
                Ok(Value::F32(narrowed))
            }
        }
        ValueKind::F64 => Ok(Value::F64(number.as_f64())),
        _ => Err(CoercionError::Unsupported {
            from: ValueKind::F64,
            to,
        }),
    }
}

fn text_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        _ => None,
    }
}

fn apply(rule: Rule, value: &Value, to: ValueKind, mode: CoercionMode) -> Result<Value, CoercionError> {
    let unsupported = || CoercionError::Unsupported {
        from: value.kind(),
        to,
    };
    let parse_failure = |text: &str| CoercionError::ParseFailure {
        text: text.to_owned(),
        to,
    };
    match rule {
        Rule::Identity => Ok(value.clone()),
        Rule::Numeric | Rule::BoolToNumeric => {
            let number = Number::of(value).ok_or_else(unsupported)?;
            cast(number, to, mode)
        }
        Rule::NumericToText | Rule::BoolToText | Rule::TimestampToText | Rule::BytesToText => {
            Ok(Value::String(value.to_string()))
        }
        Rule::NumericToBool => {
            let number = Number::of(value).ok_or_else(unsupported)?;
            Ok(Value::Bool(is_truthy_number(number.as_f64())))
        }
        Rule::TextToNumeric => {
            let text = text_of(value).ok_or_else(unsupported)?;
            let number = Number::parse(text).ok_or_else(|| parse_failure(text))?;
            cast(number, to, mode).map_err(|error| match error {
                CoercionError::Unsupported { .. } => unsupported(),
                error => error,
            })
        }
        Rule::TextToBool => {
            let text = text_of(value).ok_or_else(unsupported)?;
            Ok(Value::Bool(is_true_token(text)))
        }
        Rule::TextToTimestamp => {
            let text = text_of(value).ok_or_else(unsupported)?;
            parse_timestamp(text)
                .map(Value::Timestamp)
                .ok_or_else(|| parse_failure(text))
        }
        Rule::TextToBytes => {
            let text = text_of(value).ok_or_else(unsupported)?;
            Ok(Value::Bytes(text.as_bytes().to_vec()))
        }
    }
}

/// Converts `value` into kind `to` following the conversion table.
///
/// In lenient mode a parse failure yields the zero value of `to`; unsupported
/// pairs are an error in both modes.
pub fn coerce(value: &Value, to: ValueKind, mode: CoercionMode) -> Result<Value, CoercionError> {
    let rule = Rule::lookup(value.kind(), to).ok_or(CoercionError::Unsupported {
        from: value.kind(),
        to,
    })?;
    match apply(rule, value, to, mode) {
        Err(CoercionError::ParseFailure { text, .. }) if mode == CoercionMode::Lenient => {
            debug!("Parse '{}' to {} failed, using zero value", text, to);
            Ok(Value::zero(to))
        }
        result => result,
    }
}
