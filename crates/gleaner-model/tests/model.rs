//! Tests for gleaner-model types.

use std::collections::BTreeMap;

use gleaner_model::{Item, Record, Value};

#[test]
fn value_serializes_as_plain_json() {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::from("Alice"));
    map.insert("tags".to_string(), Value::list(["a", "b"]));
    map.insert("age".to_string(), Value::from(30));
    map.insert("missing".to_string(), Value::Null);

    let json = serde_json::to_string(&Value::Map(map)).expect("serialize value");
    assert_eq!(
        json,
        r#"{"age":30,"missing":null,"name":"Alice","tags":["a","b"]}"#
    );
}

#[test]
fn value_deserializes_integers_before_floats() {
    let value: Value = serde_json::from_str(r#"[1, 1.5, "x", true, null]"#).expect("parse");
    assert_eq!(
        value,
        Value::List(vec![
            Value::Int(1),
            Value::Float(1.5),
            Value::from("x"),
            Value::Bool(true),
            Value::Null,
        ])
    );
}

#[test]
fn item_snapshot_reflects_fields() {
    let mut item = Item::new();
    item.set_field("a", Value::from("1")).unwrap();
    let snapshot = item.snapshot();
    assert_eq!(
        snapshot.as_map().and_then(|m| m.get("a")),
        Some(&Value::from("1"))
    );
}

#[test]
fn plain_map_is_a_record() {
    let mut record: BTreeMap<String, Value> = BTreeMap::new();
    record.set_field("k", Value::from(2)).unwrap();
    assert_eq!(record.get_field("k"), Some(&Value::Int(2)));
    assert!(record.field_schema("k").is_none());
}
