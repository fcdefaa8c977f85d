// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios spanning parsing, finalization, lookup, and COW
//! editing, exercised through the public API only.

use jdoc_core::{finalize, DocError, HeapArray, HeapObject, HeapString, HeapValue, Parser, ParserOptions, Value};

fn parser() -> Parser {
    Parser::new(ParserOptions::default())
}

/// Test-only construction sugar for the `make_object(...)`/`make_array(...)`
/// shorthand `spec.md` §8's scenarios are written against; not part of the
/// crate's public API, just local to this integration test binary.
macro_rules! object {
    ( $( $key:expr => $value:expr ),* $(,)? ) => {{
        let mut o = HeapObject::new();
        $( o.set($key, $value); )*
        HeapValue::Object(o)
    }};
}

macro_rules! array {
    ( $( $value:expr ),* $(,)? ) => {{
        let mut a = HeapArray::new();
        $( a.push_back($value); )*
        HeapValue::Array(a)
    }};
}

#[test]
fn roundtrip_scalar_through_json_and_finalization() {
    let parsed = parser()
        .from_json_str(r#"{"n": 42, "s": "hello", "f": 3.5, "b": true, "z": null}"#)
        .unwrap();
    let root = match &parsed {
        HeapValue::Object(o) => o.clone(),
        _ => panic!("expected object"),
    };

    let finalized = finalize(&root).unwrap();
    assert_eq!(finalized.at("n").unwrap().integer().unwrap(), 42);
    assert_eq!(finalized.at("s").unwrap().strv().unwrap(), "hello");
    assert_eq!(finalized.at("f").unwrap().decimal().unwrap(), 3.5);
    assert!(finalized.at("b").unwrap().boolean().unwrap());
    assert!(finalized.at("z").unwrap().is_null());

    // Round-trips back to an equal heap tree.
    let lifted = jdoc_core::lift(&finalized).unwrap();
    assert_eq!(lifted, parsed);
}

#[test]
fn canonical_key_ordering_is_ascending() {
    let mut root = HeapObject::new();
    root.set("zeta", HeapValue::Integer(1));
    root.set("alpha", HeapValue::Integer(2));
    root.set("mid", HeapValue::Integer(3));

    let finalized = finalize(&root).unwrap();
    assert_eq!(finalized.keys().unwrap(), vec!["alpha", "mid", "zeta"]);
}

#[test]
fn same_object_different_insertion_order_finalizes_byte_identical() {
    let mut a = HeapObject::new();
    a.set("a", HeapValue::Integer(1));
    a.set("b", HeapValue::String(HeapString::new("x")));
    a.set("c", HeapValue::Boolean(false));

    let mut b = HeapObject::new();
    b.set("c", HeapValue::Boolean(false));
    b.set("a", HeapValue::Integer(1));
    b.set("b", HeapValue::String(HeapString::new("x")));

    let fa = finalize(&a).unwrap();
    let fb = finalize(&b).unwrap();
    assert_eq!(fa, fb);
}

#[test]
fn nested_lookup_through_the_value_facade() {
    let mut inner = HeapObject::new();
    inner.set("c", HeapValue::Integer(7));
    let mut mid = HeapObject::new();
    mid.set("b", HeapValue::Object(inner));
    let mut root = HeapObject::new();
    root.set("a", HeapValue::Object(mid));

    let value = Value::Heap(HeapValue::Object(root));
    assert_eq!(value.get_nested("a.b.c", '.').integer().unwrap(), 7);
    assert!(value.get_nested("a.missing.c", '.').is_null());

    let finalized_root = match &value {
        Value::Heap(HeapValue::Object(o)) => finalize(o).unwrap(),
        _ => unreachable!(),
    };
    let finalized_value = Value::Finalized(finalized_root);
    assert_eq!(finalized_value.get_nested("a.b.c", '.').integer().unwrap(), 7);
}

#[test]
fn cow_editing_does_not_perturb_a_cloned_sibling() {
    let mut root = HeapObject::new();
    root.set("items", HeapValue::Array(HeapArray::from_values(vec![
        HeapValue::Integer(1),
        HeapValue::Integer(2),
    ])));

    let snapshot = root.clone();

    let mut items = match root.find("items").unwrap() {
        HeapValue::Array(a) => a.clone(),
        _ => panic!("expected array"),
    };
    items.push_back(HeapValue::Integer(3));
    root.set("items", HeapValue::Array(items));

    let snapshot_items = match snapshot.find("items").unwrap() {
        HeapValue::Array(a) => a,
        _ => panic!("expected array"),
    };
    assert_eq!(snapshot_items.size(), 2);

    let root_items = match root.find("items").unwrap() {
        HeapValue::Array(a) => a,
        _ => panic!("expected array"),
    };
    assert_eq!(root_items.size(), 3);
}

#[test]
fn oversize_root_is_rejected_with_length_error_and_no_buffer() {
    // One 1 MiB string, repeated (as cheap `Rc` clones of the same
    // `HeapString`, not fresh allocations) enough times that the
    // upper-bound pre-pass alone exceeds `max_aggregate_size` before any
    // byte is written.
    let one_mib = HeapString::new(&"x".repeat(1 << 20));
    let mut array = HeapArray::new();
    for _ in 0..4100 {
        array.push_back(HeapValue::String(one_mib.clone()));
    }
    let mut root = HeapObject::new();
    root.set("big", HeapValue::Array(array));

    let result = finalize(&root);
    assert!(matches!(result, Err(DocError::LengthError { .. })));
}

#[test]
fn cow_isolation_scenario_from_spec() {
    // `let p = make_object("k", make_object("inner", 1)); let q = p.get("k");
    //  q.add_field("inner", 2);` then `p.get("k").get("inner") == 1` and
    // `q.get("inner") == 2` (spec.md §8 scenario 5).
    let p = match object! { "k" => object! { "inner" => HeapValue::Integer(1) } } {
        HeapValue::Object(o) => o,
        _ => unreachable!(),
    };
    let mut q = match p.find("k").unwrap().clone() {
        HeapValue::Object(o) => o,
        _ => unreachable!(),
    };
    q.add_field("inner", HeapValue::Integer(2));

    let p_inner = match p.find("k").unwrap() {
        HeapValue::Object(o) => o,
        _ => unreachable!(),
    };
    assert_eq!(p_inner.find("inner"), Some(&HeapValue::Integer(1)));
    assert_eq!(q.find("inner"), Some(&HeapValue::Integer(2)));
}

#[test]
fn display_renders_valid_json_for_both_representations() {
    let root = match object! {
        "a" => HeapValue::Integer(1),
        "b" => array![HeapValue::Integer(2), HeapValue::Boolean(false)]
    } {
        HeapValue::Object(o) => o,
        _ => unreachable!(),
    };

    let heap_text = Value::Heap(HeapValue::Object(root.clone())).to_string();
    let reparsed = parser().from_json_str(&heap_text).unwrap();
    assert_eq!(reparsed, HeapValue::Object(root.clone()));

    let finalized = finalize(&root).unwrap();
    let finalized_text = Value::Finalized(finalized).to_string();
    assert_eq!(finalized_text, heap_text);
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_parses_into_the_same_shape_as_equivalent_json() {
    let from_json = parser().from_json_str(r#"{"a": 1, "b": "two"}"#).unwrap();
    let from_yaml = parser().from_yaml_str("a: 1\nb: two\n").unwrap();
    assert_eq!(from_json, from_yaml);
}
