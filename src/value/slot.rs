use crate::value::format::zero_timestamp;
use crate::value::{Timestamp, Value, ValueKind};

/// A destination of statically known kind that a cell value can be written into.
///
/// `Option<T>` is a slot of the same kind as `T` that receives `None` for
/// absent values instead of the zero value.
pub trait Slot: Sized {
    /// Kind every value is converted to before it is assigned.
    const KIND: ValueKind;

    /// Extracts a value of exactly [`Self::KIND`].
    fn from_value(value: Value) -> Option<Self>;

    /// Value assigned when the source is absent.
    fn zero() -> Self;

    /// Assigns an already converted value, or the zero value when absent.
    /// A value of the wrong kind leaves the slot untouched.
    fn assign(&mut self, value: Option<Value>) {
        match value {
            Some(value) => {
                if let Some(value) = Self::from_value(value) {
                    *self = value;
                }
            }
            None => *self = Self::zero(),
        }
    }
}

macro_rules! impl_slot {
    ($($target:ty => $variant:ident = $zero:expr),* $(,)?) => {
        $(
            impl Slot for $target {
                const KIND: ValueKind = ValueKind::$variant;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_slot! {
    i8 => I8 = 0,
    i16 => I16 = 0,
    i32 => I32 = 0,
    i64 => I64 = 0,
    isize => ISize = 0,
    u8 => U8 = 0,
    u16 => U16 = 0,
    u32 => U32 = 0,
    u64 => U64 = 0,
    usize => USize = 0,
    f32 => F32 = 0.0,
    f64 => F64 = 0.0,
    bool => Bool = false,
    String => String = String::new(),
    Vec<u8> => Bytes = Vec::new(),
    Timestamp => Timestamp = zero_timestamp(),
}

impl<T: Slot> Slot for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }

    fn zero() -> Self {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_exact_kind() {
        let mut slot = 0i32;
        slot.assign(Some(Value::I32(9)));
        assert_eq!(slot, 9);
        slot.assign(Some(Value::I64(10)));
        assert_eq!(slot, 9);
        slot.assign(None);
        assert_eq!(slot, 0);
    }

    #[test]
    fn optional_slot_receives_none() {
        let mut slot: Option<String> = Some("old".to_owned());
        slot.assign(None);
        assert_eq!(slot, None);
        slot.assign(Some(Value::from("new")));
        assert_eq!(slot.as_deref(), Some("new"));
        assert_eq!(<Option<f64> as Slot>::KIND, ValueKind::F64);
    }
}
