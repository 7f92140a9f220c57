// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use std::sync::Arc;

use graphscript::graph::Edge;
use graphscript::graph::EdgeSet;
use graphscript::graph::Graph;
use graphscript::graph::NodeSet;
use graphscript::graph::Properties;
use graphscript::ExecutionError;
use graphscript::Value;

fn nodes() -> (Value, Value, Value) {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let e = graph.add_edge(a, b, "to");
    let graph = Arc::new(graph);
    (
        Graph::node(&graph, a).into(),
        Graph::node(&graph, b).into(),
        Graph::edge(&graph, e).into(),
    )
}

#[test]
fn can_round_trip_strings() {
    for string in &["", "abc", "héllo wörld", "with \"quotes\""] {
        assert_eq!(Value::from(*string).as_string().unwrap(), *string);
        assert_eq!(Value::from(string.to_string()).as_string().unwrap(), *string);
    }
}

#[test]
fn node_sets_are_true_when_nonempty() {
    let (a, _, _) = nodes();
    assert!(!Value::from(NodeSet::new()).as_bool().unwrap());
    assert!(a.as_bool().unwrap());
}

#[test]
fn scalars_coerce_to_booleans() {
    assert!(!Value::Null.as_bool().unwrap());
    assert!(Value::from(1).as_bool().unwrap());
    assert!(!Value::from(0).as_bool().unwrap());
    assert!(Value::from(0.5).as_bool().unwrap());
    assert!(Value::from("x").as_bool().unwrap());
    assert!(!Value::from("").as_bool().unwrap());
    assert!(!Value::from(Vec::<String>::new()).as_bool().unwrap());
    assert!(Value::from(vec!["x"]).as_bool().unwrap());
}

#[test]
fn non_finite_floats_become_null() {
    assert_eq!(Value::from(f64::NAN), Value::Null);
    assert_eq!(Value::from(f64::INFINITY), Value::Null);
    assert_eq!(Value::from(f64::NEG_INFINITY), Value::Null);
    assert!(!Value::from(f64::NAN).as_bool().unwrap());
    assert_eq!(Value::from(-2.5).to_string(), "-2.5");
}

#[test]
fn can_unwrap_graph_values() {
    let (a, _, e) = nodes();
    assert_eq!(a.as_node_set().map(NodeSet::len), Some(1));
    assert_eq!(a.as_edge_set(), None);
    assert_eq!(
        e.as_edge_set().and_then(EdgeSet::first).map(Edge::label),
        Some("to")
    );
    assert_eq!(e.as_node_set(), None);
}

#[test]
fn values_coerce_to_integers() {
    assert_eq!(Value::from(12).as_int().unwrap(), 12);
    assert_eq!(Value::from("-3").as_int().unwrap(), -3);
    assert_eq!(Value::Bool(true).as_int().unwrap(), 1);
    assert!(matches!(
        Value::from(1.5).as_int(),
        Err(ExecutionError::NotANumber(_))
    ));
    assert!(matches!(
        Value::Null.as_int(),
        Err(ExecutionError::NotANumber(_))
    ));
}

#[test]
fn graph_values_have_no_string_form() {
    let (a, _, e) = nodes();
    assert!(matches!(a.as_string(), Err(ExecutionError::NotAString("node set"))));
    assert!(matches!(e.as_string(), Err(ExecutionError::NotAString("edge set"))));
    assert_eq!(Value::from(vec!["x", "y"]).as_string().unwrap(), "[x y]");
    assert_eq!(Value::Null.as_string().unwrap(), "null");
}

#[test]
fn union_of_node_sets_is_idempotent() {
    let (a, b, _) = nodes();
    let ab = a.add(&b).unwrap();
    assert!(ab.add(&ab).unwrap().equals(&ab).unwrap());
    assert!(a.add(&a).unwrap().equals(&a).unwrap());
    let empty = Value::from(NodeSet::new());
    let len = |value: &Value| value.as_node_set().map(NodeSet::len);
    assert_eq!(len(&ab), Some(2));
    assert_eq!(len(&ab.add(&empty).unwrap()), len(&ab));
    assert_eq!(ab.add(&Value::Null).unwrap(), ab);
}

#[test]
fn node_set_equality_ignores_order() {
    let (a, b, _) = nodes();
    assert!(a.add(&b).unwrap().equals(&b.add(&a).unwrap()).unwrap());
    assert!(!a.equals(&b).unwrap());
}

#[test]
fn cannot_add_incompatible_values() {
    let (a, _, e) = nodes();
    assert!(matches!(
        a.add(&e),
        Err(ExecutionError::IncompatibleValue("node set", "edge set"))
    ));
    assert!(matches!(
        Value::Bool(true).add(&Value::Bool(false)),
        Err(ExecutionError::CannotAccumulate)
    ));
}

#[test]
fn can_concatenate_sequences() {
    let joined = Value::from(vec!["a"]).add(&Value::from(vec!["a", "b"])).unwrap();
    assert_eq!(joined, Value::from(vec!["a", "a", "b"]));
}

#[test]
fn can_iterate_collections() {
    let (a, b, _) = nodes();
    let ab = a.add(&b).unwrap();
    let mut seen = Vec::new();
    let result = ab
        .iterate(|node| {
            seen.push(node.to_string());
            Ok(node)
        })
        .unwrap();
    assert_eq!(seen, vec!["[a]", "[b]"]);
    assert_eq!(result, ab);

    let strings = Value::from(vec!["x", "y"]);
    let result = strings
        .iterate(|s| Ok(Value::from(vec![s.as_string()?.to_uppercase()])))
        .unwrap();
    assert_eq!(result, Value::from(vec!["X", "Y"]));

    let empty = Value::from(NodeSet::new());
    assert_eq!(empty.iterate(Ok).unwrap(), Value::Null);
}

#[test]
fn cannot_accumulate_scalars() {
    let strings = Value::from(vec!["x", "y"]);
    assert!(matches!(
        strings.iterate(|_| Ok(Value::Bool(true))),
        Err(ExecutionError::CannotAccumulate)
    ));
    assert!(matches!(
        Value::Bool(true).iterate(Ok),
        Err(ExecutionError::CannotIterate("bool"))
    ));
}

#[test]
fn booleans_compare_by_truthiness() {
    assert!(Value::Bool(true).equals(&Value::from("x")).unwrap());
    assert!(Value::Bool(false).equals(&Value::Null).unwrap());
    assert!(!Value::Null.equals(&Value::Bool(false)).unwrap());
}

#[test]
fn cannot_compare_unrelated_collections() {
    let (a, _, e) = nodes();
    assert!(matches!(
        a.equals(&e),
        Err(ExecutionError::Incomparable("node set", "edge set"))
    ));
    assert!(matches!(
        Value::from(vec!["a"]).equals(&Value::from("a")),
        Err(ExecutionError::Incomparable("string set", "string"))
    ));
}

#[test]
fn can_index_property_maps() {
    let mut properties = Properties::new();
    properties.add("name", "x").unwrap();
    properties.add("tags", vec!["a", "b"]).unwrap();
    let map = Value::from(properties);
    assert_eq!(map.index(&Value::from("name")).unwrap(), Value::from("x"));
    assert_eq!(
        map.index(&Value::from("tags")).unwrap(),
        Value::from(vec!["a", "b"])
    );
    assert_eq!(map.index(&Value::from("other")).unwrap(), Value::Null);
    assert_eq!(map.selector("length").unwrap(), Value::from(2));
}

#[test]
fn options_convert_to_null() {
    assert_eq!(Value::from(None::<&str>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}

#[test]
fn can_display_values() {
    let (a, b, e) = nodes();
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::from("a").to_string(), "\"a\"");
    assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[\"a\", \"b\"]");
    assert_eq!(
        Value::from(vec![Value::from(1), Value::from("a")]).to_string(),
        "[1, \"a\"]"
    );
    assert_eq!(a.add(&b).unwrap().to_string(), "[a, b]");
    assert_eq!(e.to_string(), "[a -to-> b]");
}

#[test]
fn can_serialize_values() {
    let (a, b, e) = nodes();
    assert_eq!(a.add(&b).unwrap().to_json().unwrap(), r#"["a","b"]"#);
    assert_eq!(
        e.to_json().unwrap(),
        r#"[{"label":"to","from":"a","to":"b"}]"#
    );
    assert_eq!(Value::from(vec!["x"]).to_json().unwrap(), r#"["x"]"#);
    assert_eq!(Value::from(42).to_json().unwrap(), "42");
    assert_eq!(Value::from(true).to_json().unwrap(), "true");
    assert_eq!(Value::Null.to_json().unwrap(), "null");
}
