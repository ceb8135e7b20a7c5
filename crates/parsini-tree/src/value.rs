//! Value types for INI documents.
//!
//! Every value produced by the parser is one of six shapes:
//! - `key=` is [`Value::Null`]
//! - `key=true` is [`Value::Bool`]
//! - `key=42` or `key=1.5` is [`Value::Number`]
//! - `key="text"` or `key=text` is [`Value::String`]
//! - `key=[1, 2]` is [`Value::Array`]
//! - a `[section]` is a [`Value::Object`] reachable from the root by name

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// An untyped INI value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Empty value (`key=`).
    #[default]
    Null,
    /// `true` / `false`, matched case-insensitively.
    Bool(bool),
    /// Numeric literal.
    Number(Number),
    /// Quoted or bare text.
    String(String),
    /// Bracketed, comma separated list.
    Array(Vec<Value>),
    /// Keyed values (the root, or a section).
    Object(Object),
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer literal that fits in `i64`.
    Int(i64),
    /// Integer literal above `i64::MAX` that fits in `u64`.
    UInt(u64),
    /// Any other literal (exponents, huge integers, long fractions).
    Float(f64),
    /// Fractional literal kept at full precision, with its nearest double.
    Decimal {
        /// The exact value as written.
        exact: Decimal,
        /// The nearest `f64`, parsed from the same text.
        approx: f64,
    },
}

impl Number {
    /// The value as a double. Exact for `Float`, rounded for everything else.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(n) => n as f64,
            Number::UInt(n) => n as f64,
            Number::Float(f) => f,
            Number::Decimal { approx, .. } => approx,
        }
    }

    /// The value as an integer, if it is integral and representable.
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Number::Int(n) => Some(i128::from(n)),
            Number::UInt(n) => Some(i128::from(n)),
            Number::Float(f) => {
                // 2^127 is the first magnitude i128 cannot hold
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1.7014118346046923e38 {
                    Some(f as i128)
                } else {
                    None
                }
            }
            Number::Decimal { exact, .. } => {
                if exact.fract().is_zero() {
                    exact.to_i128()
                } else {
                    None
                }
            }
        }
    }

    /// Whether this number carries an exact decimal representation.
    pub fn is_decimal(&self) -> bool {
        matches!(self, Number::Decimal { .. })
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::UInt(n) => write!(f, "{n}"),
            Number::Float(x) => write!(f, "{x}"),
            Number::Decimal { exact, .. } => write!(f, "{exact}"),
        }
    }
}

/// A mapping of keys to values. Keys iterate in sorted order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    entries: BTreeMap<String, Value>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check if key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, replacing (and returning) any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over entries as (key, value) pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<(String, Value)> for Object {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Object {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Value {
    /// Check if this is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as number.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Get a number as a double.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    /// Get a number as an `i64`, if it is integral and in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number()
            .and_then(Number::as_i128)
            .and_then(|n| i64::try_from(n).ok())
    }

    /// Get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Human-readable description of what this value is, for diagnostics.
    pub fn kind_description(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::String(_) => "a string",
            Value::Number(_) => "a number",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
            Value::Bool(_) => "bool",
        }
    }

    /// Get a value by path.
    ///
    /// Path segments are separated by `.`.
    /// Use `[n]` for array indexing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }

        let (segment, rest) = split_path(path);

        let value = match self {
            Value::Object(obj) => obj.get(segment)?,
            Value::Array(items) => {
                let idx: usize = segment
                    .strip_prefix('[')
                    .and_then(|s| s.strip_suffix(']'))?
                    .parse()
                    .ok()?;
                items.get(idx)?
            }
            _ => return None,
        };

        if rest.is_empty() {
            Some(value)
        } else {
            value.get(rest)
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(Number::Float(f))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

/// Split path at first `.` or `[`.
pub(crate) fn split_path(path: &str) -> (&str, &str) {
    // Handle [n] at start
    if path.starts_with('[')
        && let Some(end) = path.find(']')
    {
        let segment = &path[..=end];
        let rest = &path[end + 1..];
        let rest = rest.strip_prefix('.').unwrap_or(rest);
        return (segment, rest);
    }

    let dot_pos = path.find('.');
    let bracket_pos = path.find('[');

    match (dot_pos, bracket_pos) {
        (Some(d), Some(b)) if b < d => (&path[..b], &path[b..]),
        (Some(d), _) => (&path[..d], &path[d + 1..]),
        (None, Some(b)) => (&path[..b], &path[b..]),
        (None, None) => (path, ""),
    }
}
