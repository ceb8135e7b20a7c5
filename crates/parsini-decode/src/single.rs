//! Single-value container.

use parsini_tree::{Number, Value};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::decoder::{Decode, Frame, Scoped};
use crate::error::{DecodeError, Result};
use crate::keyed::KeyedContainer;
use crate::path::CodingPath;
use crate::unkeyed::UnkeyedContainer;

macro_rules! decode_integers {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Decode a `", stringify!($ty), "`. Fails if the number is fractional or out of range.")]
            pub fn $method(&self) -> Result<$ty> {
                self.integer(stringify!($ty))
            }
        )*
    };
}

/// A view of one value as a primitive.
#[derive(Debug)]
pub struct SingleValueContainer<'d, 'v> {
    scope: Scoped<'d, 'v>,
    value: &'v Value,
}

impl<'d, 'v> SingleValueContainer<'d, 'v> {
    pub(crate) fn new(scope: Scoped<'d, 'v>, value: &'v Value) -> Self {
        Self { scope, value }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.scope.coding_path()
    }

    /// The raw value.
    pub fn value(&self) -> &'v Value {
        self.value
    }

    /// Whether the value is null.
    pub fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    pub fn decode_bool(&self) -> Result<bool> {
        match self.present("bool")? {
            Value::Bool(b) => Ok(*b),
            other => Err(self.mismatch("bool", other)),
        }
    }

    pub fn decode_str(&self) -> Result<&'v str> {
        match self.present("String")? {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch("String", other)),
        }
    }

    pub fn decode_string(&self) -> Result<String> {
        self.decode_str().map(str::to_owned)
    }

    /// Decode any number as the nearest `f64`.
    pub fn decode_f64(&self) -> Result<f64> {
        Ok(self.number("f64")?.as_f64())
    }

    /// Decode any number as the nearest `f32`. Finite values beyond `f32`
    /// range are rejected.
    pub fn decode_f32(&self) -> Result<f32> {
        let number = self.number("f32")?;
        let x = number.as_f64();
        if x.is_finite() && x.abs() > f64::from(f32::MAX) {
            return Err(self.out_of_range(number, "f32"));
        }
        Ok(x as f32)
    }

    /// Decode a number at full precision. Fractional literals keep every
    /// digit that was written.
    pub fn decode_decimal(&self) -> Result<Decimal> {
        let number = self.number("Decimal")?;
        let decimal = match number {
            Number::Int(n) => Some(Decimal::from(n)),
            Number::UInt(n) => Some(Decimal::from(n)),
            Number::Float(f) => Decimal::from_f64(f),
            Number::Decimal { exact, .. } => Some(exact),
        };
        decimal.ok_or_else(|| self.out_of_range(number, "Decimal"))
    }

    decode_integers! {
        decode_i8 => i8,
        decode_i16 => i16,
        decode_i32 => i32,
        decode_i64 => i64,
        decode_i128 => i128,
        decode_isize => isize,
        decode_u8 => u8,
        decode_u16 => u16,
        decode_u32 => u32,
        decode_u64 => u64,
        decode_u128 => u128,
        decode_usize => usize,
    }

    /// Decode a nested value with its own [`Decode`] impl.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        let mut frame = Frame::push(&mut *self.scope, self.value);
        T::decode(&mut frame)
    }

    pub(crate) fn into_keyed(self) -> Result<KeyedContainer<'d, 'v>> {
        match self.value {
            Value::Object(object) => Ok(KeyedContainer::new(self.scope, object)),
            Value::Null => Err(DecodeError::value_not_found("an object", self.coding_path())),
            other => Err(self.mismatch("an object", other)),
        }
    }

    pub(crate) fn into_unkeyed(self) -> Result<UnkeyedContainer<'d, 'v>> {
        match self.value {
            Value::Array(items) => Ok(UnkeyedContainer::new(self.scope, items)),
            Value::Null => Err(DecodeError::value_not_found("an array", self.coding_path())),
            other => Err(self.mismatch("an array", other)),
        }
    }

    fn present(&self, expected: &str) -> Result<&'v Value> {
        if self.value.is_null() {
            Err(DecodeError::value_not_found(expected, self.coding_path()))
        } else {
            Ok(self.value)
        }
    }

    fn number(&self, expected: &str) -> Result<Number> {
        match self.present(expected)? {
            Value::Number(n) => Ok(*n),
            other => Err(self.mismatch(expected, other)),
        }
    }

    fn integer<T: TryFrom<i128>>(&self, expected: &str) -> Result<T> {
        let number = self.number(expected)?;
        number
            .as_i128()
            .and_then(|n| T::try_from(n).ok())
            .ok_or_else(|| self.out_of_range(number, expected))
    }

    fn mismatch(&self, expected: &str, found: &Value) -> DecodeError {
        DecodeError::type_mismatch(expected, found, self.coding_path())
    }

    fn out_of_range(&self, number: Number, target: &str) -> DecodeError {
        DecodeError::unrepresentable(target, format!("a number ({number})"), self.coding_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decoder;

    fn literal(text: &str) -> Value {
        parsini_tree::parse_literal(text)
    }

    #[test]
    fn test_integers() {
        let value = literal("300");
        let mut decoder = Decoder::new(&value);
        let container = decoder.single_value_container();
        assert_eq!(container.decode_i64().unwrap(), 300);
        assert_eq!(container.decode_u16().unwrap(), 300);

        let err = container.decode_u8().unwrap_err();
        insta::assert_snapshot!(err, @"type mismatch at <root>: expected to decode u8 but found a number (300) instead");
    }

    #[test]
    fn test_negative_into_unsigned() {
        let value = literal("-1");
        let mut decoder = Decoder::new(&value);
        assert!(matches!(
            decoder.single_value_container().decode_u32(),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_fraction_into_integer() {
        let value = literal("2.5");
        let mut decoder = Decoder::new(&value);
        let err = decoder.single_value_container().decode_i32().unwrap_err();
        insta::assert_snapshot!(err, @"type mismatch at <root>: expected to decode i32 but found a number (2.5) instead");

        let value = literal("2.0");
        let mut decoder = Decoder::new(&value);
        assert_eq!(decoder.single_value_container().decode_i32().unwrap(), 2);
    }

    #[test]
    fn test_big_unsigned() {
        let value = literal("18446744073709551615");
        let mut decoder = Decoder::new(&value);
        let container = decoder.single_value_container();
        assert_eq!(container.decode_u64().unwrap(), u64::MAX);
        assert!(container.decode_i64().is_err());
    }

    #[test]
    fn test_floats_and_decimals() {
        let value = literal("0.1");
        let mut decoder = Decoder::new(&value);
        let container = decoder.single_value_container();
        assert_eq!(container.decode_f64().unwrap(), 0.1);
        assert_eq!(container.decode_f32().unwrap(), 0.1f32);
        assert_eq!(container.decode_decimal().unwrap().to_string(), "0.1");

        let value = literal("1e300");
        let mut decoder = Decoder::new(&value);
        assert!(matches!(
            decoder.single_value_container().decode_f32(),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_null_is_value_not_found() {
        let value = Value::Null;
        let mut decoder = Decoder::new(&value);
        let container = decoder.single_value_container();
        assert!(container.decode_nil());
        let err = container.decode_string().unwrap_err();
        insta::assert_snapshot!(err, @"value not found at <root>: expected String");
    }

    #[test]
    fn test_type_mismatch() {
        let value = literal("\"30\"");
        let mut decoder = Decoder::new(&value);
        let err = decoder.single_value_container().decode_i32().unwrap_err();
        insta::assert_snapshot!(err, @"type mismatch at <root>: expected to decode i32 but found a string instead");
    }
}
