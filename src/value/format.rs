use crate::database::origin::OriginType;
use crate::value::{Timestamp, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Fractional digits used when rendering floats as text.
pub const FLOAT_PRECISION: usize = 6;

/// Text tokens read as `true` (compared case-insensitively).
pub const TRUE_TOKENS: [&str; 5] = ["true", "on", "yes", "1", "-1"];

/// Naive layouts accepted when parsing timestamps without an offset.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Zero timestamp: the Unix epoch in UTC.
pub fn zero_timestamp() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

/// Formats a timestamp as RFC 3339, keeping its offset and only the fractional
/// digits it needs. [`parse_timestamp`] reverses it exactly.
pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Parses an RFC 3339 timestamp. Naive datetimes and bare dates are accepted
/// too and read as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().fixed_offset())
}

/// Matches a text token against [`TRUE_TOKENS`].
pub fn is_true_token(value: &str) -> bool {
    let value = value.trim();
    TRUE_TOKENS.iter().any(|token| token.eq_ignore_ascii_case(value))
}

/// Numeric truthiness: any magnitude of at least one.
#[inline]
pub fn is_truthy_number(value: f64) -> bool {
    value >= 1.0 || value <= -1.0
}

/// Boolean heuristic applied by `value_bool`: the stored value is rendered as
/// text and matched against [`TRUE_TOKENS`].
///
/// Integral floats render without a fraction, so `1.0` reads like `1`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(value) => *value,
        Value::String(text) => is_true_token(text),
        Value::F32(number) if number.fract() == 0.0 => is_true_token(&format!("{number:.0}")),
        Value::F64(number) if number.fract() == 0.0 => is_true_token(&format!("{number:.0}")),
        other => is_true_token(&other.to_string()),
    }
}

/// Read-side display coercion of a stored value.
///
/// Bytes become text unless the origin marks them as opaque binary, or as a
/// decimal rendered as text, in which case they are parsed to `F64`. Decimal
/// text that fails to parse stays text.
pub fn display(value: &Value, origin: OriginType) -> Value {
    match (value, origin) {
        (Value::Bytes(_), OriginType::Binary) => value.clone(),
        (Value::Bytes(bytes), OriginType::Decimal) => {
            let text = String::from_utf8_lossy(bytes);
            parse_decimal(&text).unwrap_or_else(|| Value::String(text.into_owned()))
        }
        (Value::Bytes(bytes), OriginType::Other) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
        (Value::String(text), OriginType::Decimal) => {
            parse_decimal(text).unwrap_or_else(|| value.clone())
        }
        _ => value.clone(),
    }
}

/// Parses decimal text into an `F64`.
pub fn parse_decimal(text: &str) -> Option<Value> {
    text.trim().parse::<f64>().ok().map(Value::F64)
}
