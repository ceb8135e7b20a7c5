#![doc = include_str!("../README.md")]
//! Document tree representation for INI configuration files.
//!
//! This crate turns INI text into an untyped [`Value`] tree. Typed decoding on
//! top of the tree lives in `parsini-decode` and `serde_parsini`.

use std::collections::BTreeMap;

mod diagnostic;
#[cfg(feature = "json")]
mod json;
mod parser;
mod span;
mod value;

pub use diagnostic::{Malformation, ParseError, ParseErrorKind};
pub use parser::{Parser, parse_literal};
pub use span::Span;
pub use value::{Number, Object, Value};

use value::split_path;

/// Parse INI text into a [`Document`].
pub fn parse(source: &str) -> Result<Document, ParseError> {
    Parser::new(source).parse()
}

/// A parsed INI document: top-level entries plus named sections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Entries that appear before the first section header.
    pub top_level: Object,
    /// Section bodies by name. Repeated sections are already merged.
    pub sections: BTreeMap<String, Object>,
}

impl Document {
    /// Parse an INI document.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        parse(source)
    }

    /// Get a section by name.
    pub fn section(&self, name: &str) -> Option<&Object> {
        self.sections.get(name)
    }

    /// Check if the document has no entries and no sections.
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.sections.is_empty()
    }

    /// Build the root object handed to decoders.
    ///
    /// Each section becomes a nested object under its name. A top-level key
    /// with the same name as a section replaces that section.
    pub fn into_root(self) -> Value {
        let mut root: Object = self
            .sections
            .into_iter()
            .map(|(name, section)| (name, Value::Object(section)))
            .collect();
        root.extend(self.top_level);
        Value::Object(root)
    }

    /// Build the root object without consuming the document.
    pub fn root(&self) -> Value {
        self.clone().into_root()
    }

    /// Get a value by path, as it would be reached from [`Document::root`].
    ///
    /// Sections themselves are not values; reach them with [`Document::section`].
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }

        let (segment, rest) = split_path(path);
        if let Some(value) = self.top_level.get(segment) {
            return value.get(rest);
        }

        let section = self.sections.get(segment)?;
        let (key, rest) = split_path(rest);
        section.get(key)?.get(rest)
    }
}
