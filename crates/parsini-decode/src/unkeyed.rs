//! Unkeyed container: an array consumed front to back.

use parsini_tree::Value;
use rust_decimal::Decimal;

use crate::decoder::{Decode, Decoder, Scoped};
use crate::error::{DecodeError, Result};
use crate::keyed::KeyedContainer;
use crate::path::{CodingPath, PathSegment};
use crate::single::SingleValueContainer;

macro_rules! decode_elements {
    ($($method:ident => $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&mut self) -> Result<$ty> {
                let value = self.next_value(stringify!($ty))?;
                let decoded = self.element(value).$method()?;
                self.current_index += 1;
                Ok(decoded)
            }
        )*
    };
}

/// Cursor over an array. Each successful decode consumes one element; a
/// failed decode leaves the cursor where it was.
#[derive(Debug)]
pub struct UnkeyedContainer<'d, 'v> {
    scope: Scoped<'d, 'v>,
    items: &'v [Value],
    current_index: usize,
}

impl<'d, 'v> UnkeyedContainer<'d, 'v> {
    pub(crate) fn new(scope: Scoped<'d, 'v>, items: &'v [Value]) -> Self {
        Self {
            scope,
            items,
            current_index: 0,
        }
    }

    pub fn coding_path(&self) -> &CodingPath {
        self.scope.coding_path()
    }

    /// Total number of elements.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Index of the next element to decode.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Whether the next element is null. Consumes it only if it is.
    pub fn decode_nil(&mut self) -> Result<bool> {
        let value = self.next_value("nil")?;
        let is_nil = value.is_null();
        if is_nil {
            self.current_index += 1;
        }
        Ok(is_nil)
    }

    decode_elements! {
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

    /// Decode the next element with its own [`Decode`] impl.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        let value = self.next_value(&crate::short_type_name::<T>())?;
        let decoded = self.element(value).decode()?;
        self.current_index += 1;
        Ok(decoded)
    }

    pub fn nested_keyed_container(&mut self) -> Result<KeyedContainer<'_, 'v>> {
        let value = self.next_value("an object")?;
        let index = self.current_index;
        self.current_index += 1;
        let scope = Scoped::enter(&mut *self.scope, PathSegment::Index(index));
        match SingleValueContainer::new(scope, value).into_keyed() {
            Ok(container) => Ok(container),
            Err(err) => {
                self.current_index = index;
                Err(err)
            }
        }
    }

    pub fn nested_unkeyed_container(&mut self) -> Result<UnkeyedContainer<'_, 'v>> {
        let value = self.next_value("an array")?;
        let index = self.current_index;
        self.current_index += 1;
        let scope = Scoped::enter(&mut *self.scope, PathSegment::Index(index));
        match SingleValueContainer::new(scope, value).into_unkeyed() {
            Ok(container) => Ok(container),
            Err(err) => {
                self.current_index = index;
                Err(err)
            }
        }
    }

    /// A fresh decoder over the next element, which is consumed.
    pub fn super_decoder(&mut self) -> Result<Decoder<'v>> {
        let value = self.next_value("a value")?;
        let path = self
            .coding_path()
            .joined(PathSegment::Index(self.current_index));
        self.current_index += 1;
        Ok(Decoder::with_path(value, path))
    }

    fn next_value(&self, expected: &str) -> Result<&'v Value> {
        let items: &'v [Value] = self.items;
        items.get(self.current_index).ok_or_else(|| {
            DecodeError::value_not_found(
                format!("{expected} (unkeyed container is at end)"),
                &self
                    .coding_path()
                    .joined(PathSegment::Index(self.current_index)),
            )
        })
    }

    fn element(&mut self, value: &'v Value) -> SingleValueContainer<'_, 'v> {
        let scope = Scoped::enter(&mut *self.scope, PathSegment::Index(self.current_index));
        SingleValueContainer::new(scope, value)
    }
}
