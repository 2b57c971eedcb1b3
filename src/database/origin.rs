use regex::Regex;
use std::sync::LazyLock;

/// Origin labels whose values arrive as decimal text.
const DECIMAL_MARKERS: [&str; 6] = ["DECIMAL", "NUMERIC", "NUMBER", "MONEY", "SMALLMONEY", "NEWDECIMAL"];

/// Origin labels whose values are opaque bytes.
const BINARY_MARKERS: [&str; 10] = [
    "BINARY",
    "VARBINARY",
    "IMAGE",
    "BLOB",
    "TINYBLOB",
    "MEDIUMBLOB",
    "LONGBLOB",
    "BYTEA",
    "RAW",
    "GEOMETRY",
];

/// Splits `VARBINARY(MAX)` / `numeric (18, 4)` into the bare type name.
static ORIGIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_ ]*?)\s*(\(.*\))?\s*$").expect("Hardcode regex pattern"));

/// How a cell's origin type label affects read-side coercion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OriginType {
    /// No special handling.
    #[default]
    Other,
    /// Decimal rendered as text by the driver; read back as `f64`.
    Decimal,
    /// Opaque binary payload; bytes are never decoded to text.
    Binary,
}

impl OriginType {
    /// Classifies an origin label, ignoring case and any `( … )` suffix.
    pub fn classify(label: &str) -> Self {
        let Some(name) = ORIGIN_PATTERN
            .captures(label)
            .and_then(|captures| captures.get(1))
            .map(|matcher| matcher.as_str().to_ascii_uppercase())
        else {
            return Self::Other;
        };
        if DECIMAL_MARKERS.contains(&name.as_str()) {
            Self::Decimal
        } else if BINARY_MARKERS.contains(&name.as_str()) {
            Self::Binary
        } else {
            Self::Other
        }
    }

    /// Classifies an optional label; a missing label is [`OriginType::Other`].
    pub fn of(label: Option<&str>) -> Self {
        label.map(Self::classify).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_decimal() {
        assert_eq!(OriginType::classify("DECIMAL"), OriginType::Decimal);
        assert_eq!(OriginType::classify("decimal"), OriginType::Decimal);
        assert_eq!(OriginType::classify("Numeric(18,4)"), OriginType::Decimal);
        assert_eq!(OriginType::classify(" numeric (18, 4) "), OriginType::Decimal);
        assert_eq!(OriginType::classify("money"), OriginType::Decimal);
    }

    #[test]
    fn classify_binary() {
        assert_eq!(OriginType::classify("VARBINARY(MAX)"), OriginType::Binary);
        assert_eq!(OriginType::classify("image"), OriginType::Binary);
        assert_eq!(OriginType::classify("bytea"), OriginType::Binary);
    }

    #[test]
    fn classify_other() {
        assert_eq!(OriginType::classify("VARCHAR(12)"), OriginType::Other);
        assert_eq!(OriginType::classify("INT"), OriginType::Other);
        assert_eq!(OriginType::classify(""), OriginType::Other);
        assert_eq!(OriginType::classify("(18,4)"), OriginType::Other);
        assert_eq!(OriginType::of(None), OriginType::Other);
        assert_eq!(OriginType::of(Some("decimal")), OriginType::Decimal);
    }
}
