//! Coding paths and keys.
//!
//! A [`CodingPath`] records where in the value tree a decode is happening. It
//! only feeds error messages and never changes what gets decoded.

use std::fmt;

/// Reserved key used by [`KeyedContainer::super_decoder`](crate::KeyedContainer::super_decoder).
pub const SUPER_KEY: &str = "super";

/// One step into the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
    /// Delegation to a base representation.
    Super,
}

impl PathSegment {
    /// Create a key segment.
    pub fn key(key: impl Into<String>) -> Self {
        PathSegment::Key(key.into())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "Index {index}"),
            PathSegment::Super => f.write_str(SUPER_KEY),
        }
    }
}

/// The sequence of keys and indices leading to the value being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CodingPath {
    segments: Vec<PathSegment>,
}

impl CodingPath {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The innermost segment.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// A copy of this path with one more segment.
    pub fn joined(&self, segment: PathSegment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.segments.truncate(len);
    }
}

impl fmt::Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.segments.split_first() else {
            return f.write_str("<root>");
        };
        write!(f, "{first}")?;
        for segment in rest {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for CodingPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        CodingPath {
            segments: iter.into_iter().collect(),
        }
    }
}

/// A key type a keyed container can report its keys as.
///
/// Keys that do not convert are skipped by
/// [`KeyedContainer::all_keys`](crate::KeyedContainer::all_keys).
pub trait CodingKey: Sized {
    /// Convert from the key text found in the document.
    fn from_key(key: &str) -> Option<Self>;

    /// The key text to look up.
    fn as_key(&self) -> &str;
}

impl CodingKey for String {
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_owned())
    }

    fn as_key(&self) -> &str {
        self
    }
}
