//! Decode errors.

use std::error::Error as StdError;
use std::fmt;

use parsini_tree::{ParseError, Value};

use crate::path::CodingPath;

/// Result type for decode operations.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Why a decode failed. Every variant carries the path of the offending value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The value exists but has the wrong kind.
    #[error("type mismatch at {path}: expected to decode {expected} but found {found} instead")]
    TypeMismatch {
        expected: String,
        found: String,
        path: CodingPath,
    },

    /// The value is absent or null where a non-optional value was required.
    #[error("value not found at {path}: expected {expected}")]
    ValueNotFound { expected: String, path: CodingPath },

    /// A keyed container has no entry for the key.
    #[error("key not found at {path}: no value associated with key \"{key}\"")]
    KeyNotFound { key: String, path: CodingPath },

    /// The input could not be read, or custom decode logic rejected a value.
    #[error("data corrupted at {path}: {reason}")]
    DataCorrupted {
        reason: String,
        path: CodingPath,
        #[source]
        source: Option<BoxError>,
    },
}

impl DecodeError {
    /// `value` is not the kind `expected` asks for.
    pub fn type_mismatch(expected: impl Into<String>, value: &Value, path: &CodingPath) -> Self {
        DecodeError::TypeMismatch {
            expected: expected.into(),
            found: value.kind_description().to_string(),
            path: path.clone(),
        }
    }

    /// The value has the right kind but cannot be represented as `expected`;
    /// `found` describes it.
    pub fn unrepresentable(
        expected: impl Into<String>,
        found: impl Into<String>,
        path: &CodingPath,
    ) -> Self {
        DecodeError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            path: path.clone(),
        }
    }

    /// Nothing to decode `expected` from.
    pub fn value_not_found(expected: impl Into<String>, path: &CodingPath) -> Self {
        DecodeError::ValueNotFound {
            expected: expected.into(),
            path: path.clone(),
        }
    }

    /// `key` is missing from the object at `path`.
    pub fn key_not_found(key: impl Into<String>, path: &CodingPath) -> Self {
        DecodeError::KeyNotFound {
            key: key.into(),
            path: path.clone(),
        }
    }

    /// Data at `path` is unusable.
    pub fn data_corrupted(reason: impl Into<String>, path: &CodingPath) -> Self {
        DecodeError::DataCorrupted {
            reason: reason.into(),
            path: path.clone(),
            source: None,
        }
    }

    /// The input itself is unusable; `source` says why.
    pub fn corrupted_input(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        DecodeError::DataCorrupted {
            reason: reason.into(),
            path: CodingPath::root(),
            source: Some(source.into()),
        }
    }

    /// Path of the value the error is about.
    pub fn path(&self) -> &CodingPath {
        match self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::ValueNotFound { path, .. }
            | DecodeError::KeyNotFound { path, .. }
            | DecodeError::DataCorrupted { path, .. } => path,
        }
    }

    /// Replace a root path with `path`. Errors raised without position
    /// information (serde's `custom`, `missing_field`) get located this way.
    pub fn with_path_if_root(mut self, at: &CodingPath) -> Self {
        let path = match &mut self {
            DecodeError::TypeMismatch { path, .. }
            | DecodeError::ValueNotFound { path, .. }
            | DecodeError::KeyNotFound { path, .. }
            | DecodeError::DataCorrupted { path, .. } => path,
        };
        if path.is_empty() {
            *path = at.clone();
        }
        self
    }
}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        DecodeError::corrupted_input("the data is not valid INI", err)
    }
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::data_corrupted(msg.to_string(), &CodingPath::root())
    }

    fn invalid_type(unexp: serde::de::Unexpected<'_>, exp: &dyn serde::de::Expected) -> Self {
        DecodeError::TypeMismatch {
            expected: exp.to_string(),
            found: unexp.to_string(),
            path: CodingPath::root(),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        DecodeError::key_not_found(field, &CodingPath::root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;

    #[test]
    fn test_display() {
        let path: CodingPath = [PathSegment::key("participants"), PathSegment::Index(1)]
            .into_iter()
            .collect();

        let err = DecodeError::type_mismatch("i64", &Value::from("x"), &path);
        insta::assert_snapshot!(err, @"type mismatch at participants.Index 1: expected to decode i64 but found a string instead");

        let err = DecodeError::key_not_found("name", &CodingPath::root());
        insta::assert_snapshot!(err, @r#"key not found at <root>: no value associated with key "name""#);
    }

    #[test]
    fn test_with_path_if_root() {
        let at: CodingPath = [PathSegment::key("a")].into_iter().collect();
        let err = <DecodeError as serde::de::Error>::custom("bad").with_path_if_root(&at);
        assert_eq!(err.path(), &at);

        let deeper = at.joined(PathSegment::key("b"));
        let err = DecodeError::value_not_found("String", &deeper).with_path_if_root(&at);
        assert_eq!(err.path(), &deeper);
    }

    #[test]
    fn test_parse_error_is_source() {
        let parse_err = parsini_tree::parse("oops").unwrap_err();
        let err = DecodeError::from(parse_err);
        assert!(matches!(err, DecodeError::DataCorrupted { .. }));
        assert!(err.source().is_some());
        assert!(err.path().is_empty());
    }
}
