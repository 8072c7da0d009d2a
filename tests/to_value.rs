use std::collections::BTreeMap;

use serde::Serialize;

use ginger::{to_value, value, Value};

#[test]
fn to_value_bool() {
    assert_eq!(to_value(true).unwrap(), Value::Bool(true));
}

#[test]
fn to_value_integers() {
    assert_eq!(to_value(42_i32).unwrap(), Value::Integer(42));
    assert_eq!(to_value(42_u8).unwrap(), Value::Integer(42));
    assert_eq!(to_value(-1_i64).unwrap(), Value::Integer(-1));
}

#[test]
fn to_value_u64_out_of_range() {
    let err = to_value(u64::MAX).unwrap_err();
    assert_eq!(
        err.to_string(),
        "out of range integral type conversion attempted"
    );
}

#[test]
fn to_value_floats() {
    assert_eq!(to_value(1.5_f32).unwrap(), Value::Float(1.5));
    assert_eq!(to_value(1.5_f64).unwrap(), Value::Float(1.5));
}

#[test]
fn to_value_char() {
    assert_eq!(to_value('a').unwrap(), Value::String(String::from('a')));
}

#[test]
fn to_value_str() {
    assert_eq!(
        to_value("testing...").unwrap(),
        Value::String(String::from("testing..."))
    );
}

#[test]
fn to_value_none() {
    assert_eq!(to_value(None::<i32>).unwrap(), Value::None);
}

#[test]
fn to_value_some() {
    assert_eq!(
        to_value(Some("testing...")).unwrap(),
        Value::String(String::from("testing..."))
    );
}

#[test]
fn to_value_unit() {
    assert_eq!(to_value(()).unwrap(), Value::None);
}

#[test]
fn to_value_unit_struct() {
    #[derive(Serialize)]
    struct Test;
    assert_eq!(to_value(Test).unwrap(), Value::None);
}

#[test]
fn to_value_unit_variant() {
    #[derive(Serialize)]
    enum Test {
        Variant,
    }
    assert_eq!(
        to_value(Test::Variant).unwrap(),
        Value::String(String::from("Variant"))
    );
}

#[test]
fn to_value_newtype_struct() {
    #[derive(Serialize)]
    struct Test(i64);
    assert_eq!(to_value(Test(123)).unwrap(), Value::Integer(123));
}

#[test]
fn to_value_newtype_variant() {
    #[derive(Serialize)]
    enum Test {
        Variant(i64),
    }
    assert_eq!(
        to_value(Test::Variant(123)).unwrap(),
        value!({ Variant: 123 })
    );
}

#[test]
fn to_value_seq() {
    assert_eq!(to_value(vec![1, 2, 3]).unwrap(), value!([1, 2, 3]));
}

#[test]
fn to_value_tuple() {
    assert_eq!(
        to_value((1, "two", 3.0)).unwrap(),
        value!([1, "two", 3.0])
    );
}

#[test]
fn to_value_tuple_variant() {
    #[derive(Serialize)]
    enum Test {
        Variant(i64, i64),
    }
    assert_eq!(
        to_value(Test::Variant(1, 2)).unwrap(),
        value!({ Variant: [1, 2] })
    );
}

#[test]
fn to_value_map() {
    let mut map = BTreeMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    assert_eq!(to_value(map).unwrap(), value!({ a: 1, b: 2 }));
}

#[test]
fn to_value_map_integer_keys_stringify() {
    let mut map = BTreeMap::new();
    map.insert(1, "one");
    let mut exp = ginger::Map::new();
    exp.insert(String::from("1"), Value::from("one"));
    assert_eq!(to_value(map).unwrap(), Value::Map(exp));
}

#[test]
fn to_value_map_non_string_key_errors() {
    let mut map = BTreeMap::new();
    map.insert(vec![1], "x");
    let err = to_value(map).unwrap_err();
    assert_eq!(err.to_string(), "map key must be a string, got list");
}

#[test]
fn to_value_struct() {
    #[derive(Serialize)]
    struct User {
        name: String,
        age: i64,
        admin: bool,
    }
    let user = User {
        name: String::from("John"),
        age: 42,
        admin: false,
    };
    assert_eq!(
        to_value(user).unwrap(),
        value!({ name: "John", age: 42, admin: false })
    );
}

#[test]
fn to_value_struct_variant() {
    #[derive(Serialize)]
    enum Test {
        Variant { a: i64 },
    }
    assert_eq!(
        to_value(Test::Variant { a: 1 }).unwrap(),
        value!({ Variant: { a: 1 } })
    );
}

#[test]
fn to_value_nested() {
    #[derive(Serialize)]
    struct Outer {
        inner: Inner,
        list: Vec<i64>,
    }
    #[derive(Serialize)]
    struct Inner {
        leaf: String,
    }
    let outer = Outer {
        inner: Inner {
            leaf: String::from("found"),
        },
        list: vec![1, 2],
    };
    assert_eq!(
        to_value(outer).unwrap(),
        value!({ inner: { leaf: "found" }, list: [1, 2] })
    );
}

#[test]
fn value_round_trips_through_serialize() {
    let v = value!({ a: [1, 2.5, "x", None], b: { c: true } });
    assert_eq!(to_value(&v).unwrap(), v);
}
