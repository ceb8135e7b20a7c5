//! Keyed container: an object viewed as a set of named fields.

use parsini_tree::{Object, Value};
use rust_decimal::Decimal;

use crate::decoder::{Decode, Decoder, Scoped};
use crate::error::{DecodeError, Result};
use crate::path::{CodingKey, CodingPath, PathSegment, SUPER_KEY};
use crate::single::SingleValueContainer;
use crate::unkeyed::UnkeyedContainer;

static NULL: Value = Value::Null;

macro_rules! decode_fields {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&mut self, key: &str) -> Result<$ty> {
                self.field(key)?.$method()
            }
        )*
    };
}

/// View of an object. Lookups fail with [`DecodeError::KeyNotFound`] when the
/// key is absent; errors about a member carry that member's key in their path.
#[derive(Debug)]
pub struct KeyedContainer<'d, 'v> {
    scope: Scoped<'d, 'v>,
    object: &'v Object,
}

impl<'d, 'v> KeyedContainer<'d, 'v> {
    pub(crate) fn new(scope: Scoped<'d, 'v>, object: &'v Object) -> Self {
        Self { scope, object }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.scope.coding_path()
    }

    /// Keys of the object that convert to `K`, in sorted order.
    pub fn all_keys<K: CodingKey>(&self) -> Vec<K> {
        self.object.keys().filter_map(K::from_key).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.object.contains_key(key)
    }

    /// Whether the member is null. A missing key is an error, not nil.
    pub fn decode_nil(&mut self, key: &str) -> Result<bool> {
        Ok(self.field(key)?.decode_nil())
    }

    decode_fields! {
        decode_bool => bool,
        decode_string => String,
        decode_f32 => f32,
        decode_f64 => f64,
        decode_decimal => Decimal,
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

    /// Decode the member with its own [`Decode`] impl.
    pub fn decode<T: Decode>(&mut self, key: &str) -> Result<T> {
        self.field(key)?.decode()
    }

    /// Like [`decode`](Self::decode), but a missing or null member is `None`.
    pub fn decode_if_present<T: Decode>(&mut self, key: &str) -> Result<Option<T>> {
        if !self.contains(key) {
            return Ok(None);
        }
        let mut field = self.field(key)?;
        if field.decode_nil() {
            return Ok(None);
        }
        field.decode().map(Some)
    }

    pub fn nested_keyed_container(&mut self, key: &str) -> Result<KeyedContainer<'_, 'v>> {
        self.field(key)?.into_keyed()
    }

    pub fn nested_unkeyed_container(&mut self, key: &str) -> Result<UnkeyedContainer<'_, 'v>> {
        self.field(key)?.into_unkeyed()
    }

    /// A fresh decoder for the member named `super`, for types that decode a
    /// base representation separately. A missing member decodes as null.
    pub fn super_decoder(&self) -> Decoder<'v> {
        self.member_decoder(SUPER_KEY, PathSegment::Super)
    }

    /// A fresh decoder for the member under `key`. A missing member decodes as
    /// null.
    pub fn super_decoder_for_key(&self, key: &str) -> Decoder<'v> {
        self.member_decoder(key, PathSegment::key(key))
    }

    fn member_decoder(&self, key: &str, segment: PathSegment) -> Decoder<'v> {
        let object: &'v Object = self.object;
        let value = object.get(key).unwrap_or(&NULL);
        Decoder::with_path(value, self.coding_path().joined(segment))
    }

    fn field(&mut self, key: &str) -> Result<SingleValueContainer<'_, 'v>> {
        let object: &'v Object = self.object;
        let Some(value) = object.get(key) else {
            return Err(DecodeError::key_not_found(key, self.coding_path()));
        };
        let scope = Scoped::enter(&mut *self.scope, PathSegment::key(key));
        Ok(SingleValueContainer::new(scope, value))
    }
}
