//! [`Decode`] for standard types.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use parsini_tree::Value;
use rust_decimal::Decimal;

use crate::decoder::{Decode, Decoder};
use crate::error::{DecodeError, Result};

macro_rules! decode_primitive {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
                    decoder.single_value_container().$method()
                }
            }
        )*
    };
}

decode_primitive! {
    bool => decode_bool,
    String => decode_string,
    f32 => decode_f32,
    f64 => decode_f64,
    Decimal => decode_decimal,
    i8 => decode_i8,
    i16 => decode_i16,
    i32 => decode_i32,
    i64 => decode_i64,
    i128 => decode_i128,
    isize => decode_isize,
    u8 => decode_u8,
    u16 => decode_u16,
    u32 => decode_u32,
    u64 => decode_u64,
    u128 => decode_u128,
    usize => decode_usize,
}

impl Decode for char {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let container = decoder.single_value_container();
        let text = container.decode_str()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::unrepresentable(
                "char",
                format!("a string ({text:?})"),
                container.coding_path(),
            )),
        }
    }
}

/// The value itself, unchanged.
impl Decode for Value {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(decoder.value().clone())
    }
}

/// Null decodes as `None`; anything else must decode as `T`.
impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        if decoder.value().is_null() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.unkeyed_container()?;
        let mut items = Vec::with_capacity(container.count());
        while !container.is_at_end() {
            items.push(container.decode()?);
        }
        Ok(items)
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        let mut map = HashMap::with_hasher(S::default());
        for key in container.all_keys::<String>() {
            let value = container.decode(&key)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        let mut map = BTreeMap::new();
        for key in container.all_keys::<String>() {
            let value = container.decode(&key)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}
