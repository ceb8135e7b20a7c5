use std::collections::BTreeMap;

use parsini_decode::{
    CodingKey, Decimal, Decode, DecodeError, Decoder, Result, from_document, from_str,
};

#[derive(Debug, PartialEq)]
struct Address {
    city: String,
    zip: Option<String>,
}

impl Decode for Address {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Address {
            city: container.decode("city")?,
            zip: container.decode_if_present("zip")?,
        })
    }
}

#[derive(Debug, PartialEq)]
struct Person {
    name: String,
    age: u32,
    address: Address,
}

impl Decode for Person {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut container = decoder.keyed_container()?;
        Ok(Person {
            name: container.decode("name")?,
            age: container.decode("age")?,
            address: container.decode("address")?,
        })
    }
}

#[test]
fn test_end_to_end_person() {
    let person: Person =
        from_str("name=\"Alice\"\nage=30\n[address]\ncity=\"Springfield\"\n").unwrap();
    assert_eq!(
        person,
        Person {
            name: "Alice".to_string(),
            age: 30,
            address: Address {
                city: "Springfield".to_string(),
                zip: None,
            },
        }
    );
}

#[test]
fn test_missing_key_is_key_not_found() {
    let err = from_str::<Person>("name=\"Alice\"\n[address]\ncity=x\n").unwrap_err();
    match err {
        DecodeError::KeyNotFound { key, path } => {
            assert_eq!(key, "age");
            assert!(path.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_null_value_is_value_not_found() {
    let err = from_str::<Person>("name=\nage=1\n[address]\ncity=x\n").unwrap_err();
    assert!(matches!(err, DecodeError::ValueNotFound { .. }));
    assert_eq!(err.path().to_string(), "name");
}

#[test]
fn test_string_for_integer_is_type_mismatch() {
    let err = from_str::<Person>("name=Bob\nage=\"30\"\n[address]\ncity=x\n").unwrap_err();
    insta::assert_snapshot!(err, @"type mismatch at age: expected to decode u32 but found a string instead");
}

#[test]
fn test_out_of_range_integer_is_type_mismatch() {
    let err = from_str::<BTreeMap<String, u8>>("a=300").unwrap_err();
    assert!(matches!(err, DecodeError::TypeMismatch { .. }));
    insta::assert_snapshot!(err, @"type mismatch at a: expected to decode u8 but found a number (300) instead");
}

#[test]
fn test_last_write_wins() {
    let values: BTreeMap<String, i64> = from_str("a=1\na=2").unwrap();
    assert_eq!(values["a"], 2);

    let root = parsini_tree::parse("a=1\na=2").unwrap().into_root();
    let mut decoder = Decoder::new(&root);
    let mut container = decoder.keyed_container().unwrap();
    assert_eq!(container.decode_i64("a").unwrap(), 2);
}

#[test]
fn test_nested_error_path() {
    let err = from_str::<Person>("name=Bob\nage=3\n[address]\ncity=[a, b]\n").unwrap_err();
    insta::assert_snapshot!(err, @"type mismatch at address.city: expected to decode String but found an array instead");
}

#[test]
fn test_case_insensitive_flag() {
    let flags: BTreeMap<String, bool> = from_str("flag=TRUE\nother=False").unwrap();
    assert!(flags["flag"]);
    assert!(!flags["other"]);
}

#[test]
fn test_array_of_mixed_values() {
    #[derive(Debug)]
    struct Team {
        members: Vec<Option<String>>,
    }

    impl Decode for Team {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            let mut container = decoder.keyed_container()?;
            Ok(Team {
                members: container.decode("members")?,
            })
        }
    }

    let team: Team = from_str("members=[ann, \"bo\",  , cy]").unwrap();
    assert_eq!(
        team.members,
        [
            Some("ann".to_string()),
            Some("bo".to_string()),
            None,
            Some("cy".to_string())
        ]
    );
}

#[test]
fn test_fixed_arity_tuple_runs_out() {
    struct Pair(i32, i32);

    impl Decode for Pair {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            let mut items = decoder.unkeyed_container()?;
            Ok(Pair(items.decode()?, items.decode()?))
        }
    }

    struct Holder {
        pair: Pair,
    }

    impl Decode for Holder {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            Ok(Holder {
                pair: decoder.keyed_container()?.decode("pair")?,
            })
        }
    }

    let holder: Holder = from_str("pair=[3, 4]").unwrap();
    assert_eq!((holder.pair.0, holder.pair.1), (3, 4));

    let err = from_str::<Holder>("pair=[3]").err().unwrap();
    insta::assert_snapshot!(err, @"value not found at pair.Index 1: expected i32 (unkeyed container is at end)");
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Setting {
    Host,
    Port,
}

impl CodingKey for Setting {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "host" => Some(Setting::Host),
            "port" => Some(Setting::Port),
            _ => None,
        }
    }

    fn as_key(&self) -> &str {
        match self {
            Setting::Host => "host",
            Setting::Port => "port",
        }
    }
}

#[test]
fn test_all_keys_with_typed_keys() {
    struct Known(Vec<Setting>, u16);

    impl Decode for Known {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            let mut container = decoder.keyed_container()?;
            let keys = container.all_keys::<Setting>();
            let port = match keys.iter().find(|k| **k == Setting::Port) {
                Some(key) => container.decode(key.as_key())?,
                None => 0,
            };
            Ok(Known(keys, port))
        }
    }

    let known: Known = from_str("port=8080\nhost=example.com\nunused=1").unwrap();
    assert_eq!(known.0, [Setting::Host, Setting::Port]);
    assert_eq!(known.1, 8080);
}

#[test]
fn test_class_with_super() {
    struct Base {
        id: u64,
    }

    impl Decode for Base {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            Ok(Base {
                id: decoder.keyed_container()?.decode("id")?,
            })
        }
    }

    struct Derived {
        base: Base,
        label: String,
    }

    impl Decode for Derived {
        fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
            let mut container = decoder.keyed_container()?;
            let base = Base::decode(&mut container.super_decoder())?;
            Ok(Derived {
                base,
                label: container.decode("label")?,
            })
        }
    }

    let derived: Derived = from_str("label=child\n[super]\nid=42").unwrap();
    assert_eq!(derived.base.id, 42);
    assert_eq!(derived.label, "child");

    let err = from_str::<Derived>("label=child\n[super]\nid=x").err().unwrap();
    assert_eq!(err.path().to_string(), "super.id");
}

#[test]
fn test_decimal_keeps_precision() {
    let prices: BTreeMap<String, Decimal> =
        from_str("price=19.990000000000000000000001\nwhole=12").unwrap();
    assert_eq!(prices["price"].to_string(), "19.990000000000000000000001");
    assert_eq!(prices["whole"], Decimal::from(12));

    let doubles: BTreeMap<String, f64> = from_str("price=19.99").unwrap();
    assert_eq!(doubles["price"], 19.99);
}

#[test]
fn test_from_document_matches_from_str() {
    let source = "a=1\n[s]\nb=[x, y]\n";
    let document = parsini_tree::parse(source).unwrap();
    let from_doc: parsini_decode::Value = from_document(document).unwrap();
    let direct: parsini_decode::Value = from_str(source).unwrap();
    assert_eq!(from_doc, direct);
}

#[test]
fn test_section_merge_decodes() {
    let sections: BTreeMap<String, BTreeMap<String, i64>> =
        from_str("[s]\na=1\n[s]\nb=2").unwrap();
    assert_eq!(sections["s"].len(), 2);
    assert_eq!(sections["s"]["b"], 2);
}
