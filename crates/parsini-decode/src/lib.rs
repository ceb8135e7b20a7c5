#![doc = include_str!("../README.md")]

mod decoder;
mod error;
mod impls;
mod keyed;
mod path;
mod single;
mod storage;
mod unkeyed;

pub use decoder::{Decode, Decoder};
pub use error::{DecodeError, Result};
pub use keyed::KeyedContainer;
pub use path::{CodingKey, CodingPath, PathSegment, SUPER_KEY};
pub use single::SingleValueContainer;
pub use unkeyed::UnkeyedContainer;

pub use parsini_tree::{Document, Number, Object, Value};
pub use rust_decimal::Decimal;

use tracing::debug;

/// Parse INI text and decode it as `T`.
pub fn from_str<T: Decode>(source: &str) -> Result<T> {
    let document = parsini_tree::parse(source)?;
    from_document(document)
}

/// Like [`from_str`], for raw bytes. The bytes must be UTF-8.
pub fn from_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
    let source = std::str::from_utf8(bytes)
        .map_err(|err| DecodeError::corrupted_input("the data is not valid UTF-8", err))?;
    from_str(source)
}

/// Decode a parsed document. Sections become objects under the root.
pub fn from_document<T: Decode>(document: Document) -> Result<T> {
    from_value(&document.into_root())
}

/// Decode `T` from an already built value tree.
pub fn from_value<T: Decode>(value: &Value) -> Result<T> {
    debug!(
        target_type = %short_type_name::<T>(),
        kind = value.kind_description(),
        "decoding"
    );
    let mut decoder = Decoder::new(value);
    decoder.single_value_container().decode()
}

/// `std::any::type_name` with module paths stripped, for error messages.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    fn last_segment(path: &str) -> &str {
        path.rsplit("::").next().unwrap_or(path)
    }

    let full = std::any::type_name::<T>();
    let mut out = String::with_capacity(full.len());
    let mut path = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&path));
    out
}
