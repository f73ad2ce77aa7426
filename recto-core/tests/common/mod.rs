// Test utilities and generators for recto property-based testing

#![allow(dead_code)]

use proptest::prelude::*;
use recto_core::data::{TypeTag, Value};
use recto_core::record::{Record, Vlist};
use recto_core::schema::AttrSpec;

/// Generate TypeTag values
pub fn arb_type_tag() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        Just(TypeTag::Str),
        Just(TypeTag::Num),
        Just(TypeTag::Bool),
        Just(TypeTag::Seq),
        Just(TypeTag::Nul),
        Just(TypeTag::Rec),
    ]
}

/// Generate attribute names
pub fn arb_attr_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id".to_string()),
        Just("name".to_string()),
        Just("size".to_string()),
        Just("count".to_string()),
        Just("label".to_string()),
        "[a-z][a-z0-9_]{0,8}".prop_map(|s| s.to_string()),
    ]
}

/// Generate a Value with limited recursion depth. Numbers stay integral
/// so equality-based properties hold exactly.
pub fn arb_value_depth(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Absent),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::Str),
        any::<i32>().prop_map(|n| Value::Num(f64::from(n))),
        any::<bool>().prop_map(Value::Bool),
    ];

    leaf.prop_recursive(depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Seq),
            inner.prop_map(|v| Value::Rec(Box::new(wrap_record(v)))),
        ]
    })
}

/// Generate a reasonable Value (depth 2)
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_value_depth(2)
}

/// Generate a Value admitted by the given tag
pub fn arb_value_for_tag(tag: TypeTag) -> BoxedStrategy<Value> {
    match tag {
        TypeTag::Str => "[a-z]{0,10}".prop_map(Value::Str).boxed(),
        TypeTag::Num => any::<i32>().prop_map(|n| Value::Num(f64::from(n))).boxed(),
        TypeTag::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        TypeTag::Seq => prop::collection::vec(arb_value_depth(1), 0..4)
            .prop_map(Value::Seq)
            .boxed(),
        TypeTag::Nul => Just(Value::Absent).boxed(),
        TypeTag::Rec => arb_value_depth(1)
            .prop_map(|v| Value::Rec(Box::new(wrap_record(v))))
            .boxed(),
    }
}

/// A one-attribute record carrying an arbitrary value, for nesting.
pub fn wrap_record(value: Value) -> Record {
    Record::construct(
        "Wrap",
        &["inner".into()],
        Vlist::pairs(vec![("inner", value)]),
        None,
    )
    .unwrap()
}

/// The five-record collection used by the query-engine scenarios:
/// `cstr` alpha..echo, `aint` 4 0 1 3 2, `estr` defined on three records
/// with two distinct values.
pub fn five_part_fixture() -> Vec<Record> {
    let specs: Vec<AttrSpec> = vec!["cstr=str".into(), "aint=num".into(), "estr=str".into()];
    let rows: [(&str, f64, Option<&str>); 5] = [
        ("alpha", 4.0, Some("aaa")),
        ("bravo", 0.0, None),
        ("charlie", 1.0, Some("bbb")),
        ("delta", 3.0, None),
        ("echo", 2.0, Some("bbb")),
    ];

    rows.iter()
        .map(|(cstr, aint, estr)| {
            let mut pairs = vec![
                ("cstr".to_string(), Value::Str((*cstr).to_string())),
                ("aint".to_string(), Value::Num(*aint)),
            ];
            if let Some(estr) = estr {
                pairs.push(("estr".to_string(), Value::Str((*estr).to_string())));
            }
            Record::construct("Fixture", &specs, Vlist::Pairs(pairs), None).unwrap()
        })
        .collect()
}

/// Project `cstr` across a collection, unwrapping to plain strings.
pub fn cstr_names(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| match record.get("cstr").unwrap() {
            Value::Str(s) => s,
            other => panic!("expected string cstr, got {:?}", other),
        })
        .collect()
}
