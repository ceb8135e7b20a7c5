//! The decode context and the [`Decode`] trait.

use std::ops::{Deref, DerefMut};

use parsini_tree::Value;
use tracing::trace;

use crate::error::Result;
use crate::keyed::KeyedContainer;
use crate::path::{CodingPath, PathSegment};
use crate::single::SingleValueContainer;
use crate::storage::Storage;
use crate::unkeyed::UnkeyedContainer;

/// A type that can be built from a value tree.
///
/// Implementations ask the decoder for exactly one container and read
/// themselves out of it:
///
/// ```
/// use parsini_decode::{Decode, Decoder, Result};
///
/// struct Address {
///     city: String,
/// }
///
/// impl Decode for Address {
///     fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
///         let mut container = decoder.keyed_container()?;
///         Ok(Address {
///             city: container.decode("city")?,
///         })
///     }
/// }
///
/// let address: Address = parsini_decode::from_str("city=\"Springfield\"").unwrap();
/// assert_eq!(address.city, "Springfield");
/// ```
pub trait Decode: Sized {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self>;
}

/// Decode context: a stack of values being decoded plus the current path.
#[derive(Debug)]
pub struct Decoder<'v> {
    storage: Storage<'v>,
    path: CodingPath,
}

impl<'v> Decoder<'v> {
    /// A decoder rooted at `root`.
    pub fn new(root: &'v Value) -> Self {
        Self::with_path(root, CodingPath::root())
    }

    /// A decoder rooted at `root` that reports errors below `path`.
    pub fn with_path(root: &'v Value, path: CodingPath) -> Self {
        Self {
            storage: Storage::new(root),
            path,
        }
    }

    /// Path of the value currently on top of the stack.
    pub fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    /// The value currently on top of the stack.
    pub fn value(&self) -> &'v Value {
        self.storage.top()
    }

    /// View the current value as an object.
    pub fn keyed_container(&mut self) -> Result<KeyedContainer<'_, 'v>> {
        self.single_value_container().into_keyed()
    }

    /// View the current value as an array.
    pub fn unkeyed_container(&mut self) -> Result<UnkeyedContainer<'_, 'v>> {
        self.single_value_container().into_unkeyed()
    }

    /// View the current value as a single primitive.
    pub fn single_value_container(&mut self) -> SingleValueContainer<'_, 'v> {
        let value = self.storage.top();
        SingleValueContainer::new(Scoped::unscoped(self), value)
    }

    #[cfg(test)]
    pub(crate) fn storage_depth(&self) -> usize {
        self.storage.len()
    }
}

/// Mutable access to a decoder that restores its coding path on drop.
///
/// Containers own one of these, so a container going out of scope, on any
/// path including `?`, removes the segment it was created under.
#[derive(Debug)]
pub(crate) struct Scoped<'d, 'v> {
    decoder: &'d mut Decoder<'v>,
    restore_len: usize,
}

impl<'d, 'v> Scoped<'d, 'v> {
    /// Borrow without adding a segment.
    pub(crate) fn unscoped(decoder: &'d mut Decoder<'v>) -> Self {
        let restore_len = decoder.path.len();
        Self {
            decoder,
            restore_len,
        }
    }

    /// Borrow with `segment` appended until drop.
    pub(crate) fn enter(decoder: &'d mut Decoder<'v>, segment: PathSegment) -> Self {
        let restore_len = decoder.path.len();
        trace!(%segment, depth = restore_len + 1, "enter path");
        decoder.path.push(segment);
        Self {
            decoder,
            restore_len,
        }
    }
}

impl<'v> Deref for Scoped<'_, 'v> {
    type Target = Decoder<'v>;

    fn deref(&self) -> &Decoder<'v> {
        &*self.decoder
    }
}

impl<'v> DerefMut for Scoped<'_, 'v> {
    fn deref_mut(&mut self) -> &mut Decoder<'v> {
        &mut *self.decoder
    }
}

impl Drop for Scoped<'_, '_> {
    fn drop(&mut self) {
        self.decoder.path.truncate(self.restore_len);
    }
}

/// A value pushed on the decoder's stack until drop.
pub(crate) struct Frame<'d, 'v> {
    decoder: &'d mut Decoder<'v>,
}

impl<'d, 'v> Frame<'d, 'v> {
    pub(crate) fn push(decoder: &'d mut Decoder<'v>, value: &'v Value) -> Self {
        decoder.storage.push(value);
        Self { decoder }
    }
}

impl<'v> Deref for Frame<'_, 'v> {
    type Target = Decoder<'v>;

    fn deref(&self) -> &Decoder<'v> {
        &*self.decoder
    }
}

impl<'v> DerefMut for Frame<'_, 'v> {
    fn deref_mut(&mut self) -> &mut Decoder<'v> {
        &mut *self.decoder
    }
}

impl Drop for Frame<'_, '_> {
    fn drop(&mut self) {
        self.decoder.storage.pop();
    }
}
