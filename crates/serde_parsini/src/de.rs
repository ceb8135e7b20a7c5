//! Serde deserializer over a parsed INI value tree.

use std::collections::btree_map;
use std::slice;

use parsini_decode::{CodingPath, Decode, DecodeError, Decoder, PathSegment, Result};
use parsini_tree::{Number, Value};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Unexpected, Visitor};

/// Deserializer over a borrowed [`Value`].
///
/// Scalars go through the same checks as [`parsini_decode`]'s single-value
/// container, so range and null handling match the `Decode` path.
pub struct Deserializer<'de> {
    value: &'de Value,
    path: CodingPath,
}

impl<'de> Deserializer<'de> {
    /// Create a deserializer rooted at `value`.
    pub fn new(value: &'de Value) -> Self {
        Self::with_path(value, CodingPath::root())
    }

    fn with_path(value: &'de Value, path: CodingPath) -> Self {
        Self { value, path }
    }

    fn child(&self, segment: PathSegment, value: &'de Value) -> Self {
        Self::with_path(value, self.path.joined(segment))
    }

    fn decode<T: Decode>(&self) -> Result<T> {
        T::decode(&mut Decoder::with_path(self.value, self.path.clone()))
    }

    /// Errors raised by visitors carry no position; give them ours.
    fn located<T>(&self, result: Result<T>) -> Result<T> {
        result.map_err(|err| err.with_path_if_root(&self.path))
    }

    fn unexpected(&self, expected: &str) -> DecodeError {
        if self.value.is_null() {
            DecodeError::value_not_found(expected, &self.path)
        } else {
            DecodeError::type_mismatch(expected, self.value, &self.path)
        }
    }
}

macro_rules! deserialize_scalars {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                let value = self.decode()?;
                self.located(visitor.$visit(value))
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = DecodeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value: &'de Value = self.value;
        let result = match value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(Number::Int(n)) => visitor.visit_i64(*n),
            Value::Number(Number::UInt(n)) => visitor.visit_u64(*n),
            Value::Number(Number::Float(f)) => visitor.visit_f64(*f),
            Value::Number(Number::Decimal { approx, .. }) => visitor.visit_f64(*approx),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(_) => return self.deserialize_seq(visitor),
            Value::Object(_) => return self.deserialize_map(visitor),
        };
        self.located(result)
    }

    deserialize_scalars! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let s = Decoder::with_path(self.value, self.path.clone())
            .single_value_container()
            .decode_str()?;
        self.located(visitor.visit_borrowed_str(s))
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value: &'de Value = self.value;
        match value {
            Value::String(s) => self.located(visitor.visit_borrowed_bytes(s.as_bytes())),
            _ => self.deserialize_seq(visitor),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.value.is_null() {
            self.located(visitor.visit_none())
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => self.located(visitor.visit_unit()),
            _ => Err(self.unexpected("unit")),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value: &'de Value = self.value;
        let Value::Array(items) = value else {
            return Err(self.unexpected("an array"));
        };
        let mut access = SeqAccess {
            items: items.iter(),
            index: 0,
            path: &self.path,
        };
        let result = visitor.visit_seq(&mut access);
        self.located(result)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let value: &'de Value = self.value;
        let Value::Object(object) = value else {
            return Err(self.unexpected("an object"));
        };
        let mut access = MapAccess {
            entries: object.iter(),
            pending: None,
            path: &self.path,
        };
        let result = visitor.visit_map(&mut access);
        self.located(result)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    /// Unit variants are bare strings; other variants are an object with a
    /// single key naming the variant.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let value: &'de Value = self.value;
        let access = match value {
            Value::String(variant) => EnumAccess {
                variant,
                payload: None,
            },
            Value::Object(object) if object.len() == 1 => {
                let Some((variant, payload)) = object.iter().next() else {
                    return Err(self.unexpected("an enum"));
                };
                EnumAccess {
                    variant,
                    payload: Some(self.child(PathSegment::key(variant.as_str()), payload)),
                }
            }
            _ => return Err(self.unexpected("an enum")),
        };
        let result = visitor.visit_enum(access);
        self.located(result)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Sequence access for serde.
struct SeqAccess<'a, 'de> {
    items: slice::Iter<'de, Value>,
    index: usize,
    path: &'a CodingPath,
}

impl<'de> de::SeqAccess<'de> for SeqAccess<'_, 'de> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        let Some(value) = self.items.next() else {
            return Ok(None);
        };
        let path = self.path.joined(PathSegment::Index(self.index));
        self.index += 1;
        seed.deserialize(&mut Deserializer::with_path(value, path))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Map access for serde.
struct MapAccess<'a, 'de> {
    entries: btree_map::Iter<'de, String, Value>,
    pending: Option<(&'de str, &'de Value)>,
    path: &'a CodingPath,
}

impl<'de> de::MapAccess<'de> for MapAccess<'_, 'de> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some((key.as_str(), value));
        seed.deserialize(BorrowedStrDeserializer::new(key.as_str()))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("value requested before key"));
        };
        let path = self.path.joined(PathSegment::key(key));
        seed.deserialize(&mut Deserializer::with_path(value, path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Enum access for serde.
struct EnumAccess<'de> {
    variant: &'de str,
    payload: Option<Deserializer<'de>>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = DecodeError;
    type Variant = VariantAccess<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(self.variant))?;
        Ok((
            variant,
            VariantAccess {
                payload: self.payload,
            },
        ))
    }
}

/// Variant access for serde.
struct VariantAccess<'de> {
    payload: Option<Deserializer<'de>>,
}

impl<'de> VariantAccess<'de> {
    fn payload(self, expected: &'static str) -> Result<Deserializer<'de>> {
        self.payload
            .ok_or_else(|| de::Error::invalid_type(Unexpected::UnitVariant, &expected))
    }
}

impl<'de> de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<()> {
        match self.payload {
            None => Ok(()),
            Some(payload) if payload.value.is_null() => Ok(()),
            Some(payload) => Err(payload.unexpected("unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        let mut payload = self.payload("newtype variant")?;
        seed.deserialize(&mut payload)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut payload = self.payload("tuple variant")?;
        de::Deserializer::deserialize_seq(&mut payload, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut payload = self.payload("struct variant")?;
        de::Deserializer::deserialize_map(&mut payload, visitor)
    }
}
