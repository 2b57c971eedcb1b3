//! The conversion matrix between kind classes.
//!
//! Every supported `(source, destination)` pair appears exactly once in
//! [`RULES`]; a pair missing from the table is unsupported.
use crate::value::{KindClass, ValueKind};

/// How a source value reaches a destination kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Same kind, value copied.
    Identity,
    /// Cast between numeric kinds.
    Numeric,
    /// Base-10 rendering of a number.
    NumericToText,
    /// `>= 1 || <= -1` is true.
    NumericToBool,
    /// `true` is 1, `false` is 0.
    BoolToNumeric,
    /// `true` / `false`.
    BoolToText,
    /// Decimal literal parsing.
    TextToNumeric,
    /// Token match against the true tokens.
    TextToBool,
    /// Timestamp profile parsing.
    TextToTimestamp,
    /// UTF-8 bytes of the text.
    TextToBytes,
    /// Lossy UTF-8 decoding.
    BytesToText,
    /// Timestamp profile formatting.
    TimestampToText,
}

use KindClass::{Bool, Bytes, Float, Signed, Text, Timestamp, Unsigned};

/// Supported conversions between distinct kinds.
pub const RULES: &[(KindClass, KindClass, Rule)] = &[
    (Signed, Signed, Rule::Numeric),
    (Signed, Unsigned, Rule::Numeric),
    (Signed, Float, Rule::Numeric),
    (Signed, Bool, Rule::NumericToBool),
    (Signed, Text, Rule::NumericToText),
    (Unsigned, Signed, Rule::Numeric),
    (Unsigned, Unsigned, Rule::Numeric),
    (Unsigned, Float, Rule::Numeric),
    (Unsigned, Bool, Rule::NumericToBool),
    (Unsigned, Text, Rule::NumericToText),
    (Float, Signed, Rule::Numeric),
    (Float, Unsigned, Rule::Numeric),
    (Float, Float, Rule::Numeric),
    (Float, Bool, Rule::NumericToBool),
    (Float, Text, Rule::NumericToText),
    (Bool, Signed, Rule::BoolToNumeric),
    (Bool, Unsigned, Rule::BoolToNumeric),
    (Bool, Float, Rule::BoolToNumeric),
    (Bool, Text, Rule::BoolToText),
    (Text, Signed, Rule::TextToNumeric),
    (Text, Unsigned, Rule::TextToNumeric),
    (Text, Float, Rule::TextToNumeric),
    (Text, Bool, Rule::TextToBool),
    (Text, Bytes, Rule::TextToBytes),
    (Text, Timestamp, Rule::TextToTimestamp),
    (Bytes, Text, Rule::BytesToText),
    (Timestamp, Text, Rule::TimestampToText),
];

impl Rule {
    /// Looks up the rule converting `source` into `destination`.
    pub fn lookup(source: ValueKind, destination: ValueKind) -> Option<Rule> {
        if source == destination {
            return Some(Rule::Identity);
        }
        let (source, destination) = (source.class(), destination.class());
        RULES
            .iter()
            .find(|(from, to, _)| *from == source && *to == destination)
            .map(|(_, _, rule)| *rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_no_duplicate_pairs() {
        let pairs: HashSet<_> = RULES.iter().map(|(from, to, _)| (*from, *to)).collect();
        assert_eq!(pairs.len(), RULES.len());
    }

    #[test]
    fn every_kind_converts_to_itself() {
        for kind in ValueKind::ALL {
            assert_eq!(Rule::lookup(kind, kind), Some(Rule::Identity));
        }
    }

    #[test]
    fn every_kind_converts_to_text() {
        for kind in ValueKind::ALL {
            assert!(Rule::lookup(kind, ValueKind::String).is_some(), "{kind}");
        }
    }

    #[test]
    fn lookup_by_class() {
        assert_eq!(Rule::lookup(ValueKind::I8, ValueKind::U64), Some(Rule::Numeric));
        assert_eq!(Rule::lookup(ValueKind::F32, ValueKind::F64), Some(Rule::Numeric));
        assert_eq!(Rule::lookup(ValueKind::String, ValueKind::Timestamp), Some(Rule::TextToTimestamp));
        assert_eq!(Rule::lookup(ValueKind::USize, ValueKind::Bool), Some(Rule::NumericToBool));
        assert_eq!(Rule::lookup(ValueKind::Timestamp, ValueKind::I64), None);
        assert_eq!(Rule::lookup(ValueKind::Bytes, ValueKind::F64), None);
        assert_eq!(Rule::lookup(ValueKind::Bool, ValueKind::Timestamp), None);
    }
}
