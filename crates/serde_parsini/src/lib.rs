//! Serde support for INI documents.
//!
//! Documents are parsed into a value tree first and then deserialized, so the
//! same null, range and path rules apply as for [`parsini_decode`].
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use serde_parsini::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     name: String,
//!     port: u16,
//! }
//!
//! let ini = "name=myapp\nport=8080";
//! let config: Config = from_str(ini).unwrap();
//! assert_eq!(config.name, "myapp");
//! assert_eq!(config.port, 8080);
//! ```

mod de;

pub use de::Deserializer;
pub use parsini_decode::{DecodeError as Error, Result};

use parsini_tree::Value;
use serde::de::{Deserialize, DeserializeOwned};

/// Deserialize a value from INI text.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use serde_parsini::from_str;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Person {
///     name: String,
///     age: u32,
///     address: Address,
/// }
///
/// let ini = "name=\"Alice\"\nage=30\n[address]\ncity=\"Springfield\"\n";
/// let person: Person = from_str(ini).unwrap();
/// assert_eq!(person.name, "Alice");
/// assert_eq!(person.address.city, "Springfield");
/// ```
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let root = parsini_tree::parse(s)?.into_root();
    from_value(&root)
}

/// Deserialize a value from an already parsed tree. Strings may borrow from it.
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    let mut deserializer = Deserializer::new(value);
    T::deserialize(&mut deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Simple {
        name: String,
        value: i32,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Nested {
        inner: Simple,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct WithVec {
        items: Vec<i32>,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct WithOptional {
        required: String,
        optional: Option<i32>,
    }

    #[test]
    fn test_deserialize_simple_struct() {
        let input = "name=hello\nvalue=42";
        let result: Simple = from_str(input).unwrap();
        assert_eq!(result.name, "hello");
        assert_eq!(result.value, 42);
    }

    #[test]
    fn test_deserialize_quoted_string() {
        let input = r#"name="hello world"
value=123"#;
        let result: Simple = from_str(input).unwrap();
        assert_eq!(result.name, "hello world");
        assert_eq!(result.value, 123);
    }

    #[test]
    fn test_deserialize_section_as_nested_struct() {
        let input = "[inner]\nname=x\nvalue=-7";
        let result: Nested = from_str(input).unwrap();
        assert_eq!(
            result.inner,
            Simple {
                name: "x".into(),
                value: -7
            }
        );
    }

    #[test]
    fn test_deserialize_optional_present() {
        let input = "required=hello\noptional=42";
        let result: WithOptional = from_str(input).unwrap();
        assert_eq!(result.optional, Some(42));
    }

    #[test]
    fn test_deserialize_optional_absent_or_empty() {
        let result: WithOptional = from_str("required=hello").unwrap();
        assert_eq!(result.optional, None);

        let result: WithOptional = from_str("required=hello\noptional=").unwrap();
        assert_eq!(result.optional, None);
    }

    #[test]
    fn test_deserialize_bool_values() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Flags {
            enabled: bool,
            debug: bool,
        }

        let input = "enabled=TRUE\ndebug=false";
        let result: Flags = from_str(input).unwrap();
        assert!(result.enabled);
        assert!(!result.debug);
    }

    #[test]
    fn test_deserialize_vec() {
        let input = "items=[1, 2, 3]";
        let result: WithVec = from_str(input).unwrap();
        assert_eq!(result.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_deserialize_enums() {
        #[derive(Deserialize, Debug, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Level {
            Debug,
            Info,
        }

        #[derive(Deserialize, Debug, PartialEq)]
        enum Target {
            File { path: String },
        }

        #[derive(Deserialize, Debug, PartialEq)]
        struct Logging {
            level: Level,
            target: Target,
        }

        #[derive(Deserialize, Debug, PartialEq)]
        struct Root {
            logging: Logging,
        }

        let input = "[logging]\nlevel=info\n";
        let err = from_str::<Root>(input).unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref key, .. } if key == "target"));
        assert_eq!(err.path().to_string(), "logging");

        let root = Value::Object(
            [(
                "logging".to_string(),
                Value::Object(
                    [
                        ("level".to_string(), Value::from("debug")),
                        (
                            "target".to_string(),
                            Value::Object(
                                [(
                                    "File".to_string(),
                                    Value::Object(
                                        [("path".to_string(), Value::from("/tmp/log"))]
                                            .into_iter()
                                            .collect(),
                                    ),
                                )]
                                .into_iter()
                                .collect(),
                            ),
                        ),
                    ]
                    .into_iter()
                    .collect(),
                ),
            )]
            .into_iter()
            .collect(),
        );
        let result: Root = from_value(&root).unwrap();
        assert_eq!(result.logging.level, Level::Debug);
        assert_eq!(
            result.logging.target,
            Target::File {
                path: "/tmp/log".into()
            }
        );
    }

    #[test]
    fn test_error_paths() {
        let err = from_str::<Nested>("[inner]\nname=x\nvalue=\"7\"").unwrap_err();
        insta::assert_snapshot!(err, @"type mismatch at inner.value: expected to decode i32 but found a string instead");

        let err = from_str::<WithVec>("items=[1, 2, 3000000000]").unwrap_err();
        insta::assert_snapshot!(err, @"type mismatch at items.Index 2: expected to decode i32 but found a number (3000000000) instead");

        let err = from_str::<Simple>("name=\nvalue=1").unwrap_err();
        insta::assert_snapshot!(err, @"value not found at name: expected String");
    }

    #[test]
    fn test_borrowed_strings() {
        #[derive(Deserialize)]
        struct Borrowed<'a> {
            name: &'a str,
        }

        let root = parsini_tree::parse("name=borrowed").unwrap().into_root();
        let result: Borrowed<'_> = from_value(&root).unwrap();
        assert_eq!(result.name, "borrowed");
    }

    #[test]
    fn test_untyped_map() {
        let result: BTreeMap<String, BTreeMap<String, String>> =
            from_str("[a]\nx=1s\n[b]\ny=two").unwrap();
        assert_eq!(result["a"]["x"], "1s");
        assert_eq!(result["b"]["y"], "two");
    }

    #[test]
    fn test_syntax_error() {
        let err = from_str::<Simple>("name=x\nvalue").unwrap_err();
        assert!(matches!(err, Error::DataCorrupted { .. }));
    }
}
