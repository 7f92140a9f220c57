// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use std::convert::Infallible;
use std::sync::Arc;

use graphscript::graph::Graph;
use graphscript::graph::NodeSet;
use graphscript::graph::PropertyValue;
use graphscript::graph::Walk;
use indoc::indoc;

#[test]
fn can_overwrite_properties() {
    let mut graph = Graph::new();
    let node = graph.add_node("node0");
    let properties = &mut graph[node].properties;
    properties.add("name", "node0").unwrap();
    properties.add("name", "overwritten").unwrap_err();
    assert_eq!(
        *properties.get("name").unwrap(),
        PropertyValue::from("overwritten")
    );
    assert_eq!(properties.len(), 1);
}

#[test]
fn can_display_graph() {
    let mut graph = Graph::new();
    let node0 = graph.add_node("node0");
    graph[node0].label = Some("Root".to_string());
    graph[node0].add_type("Object");
    graph[node0].add_type("Object");
    graph[node0].properties.add("name", "node0").unwrap();
    let node1 = graph.add_node("node1");
    graph[node1].value = Some("42".to_string());
    graph[node1]
        .properties
        .add("tags", vec!["a", "b"])
        .unwrap();
    let edge01 = graph.add_edge(node0, node1, "has");
    graph[edge01].properties.add("precedence", "14").unwrap();
    assert_eq!(
        graph.to_string(),
        indoc! {r#"
          node node0
            label: "Root"
            types: ["Object"]
            name: "node0"
          edge node0 -> node1 "has"
            precedence: "14"
          node node1
            value: "42"
            tags: ["a", "b"]
        "#}
    );
}

#[test]
fn can_serialize_graph() {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    graph[b].add_type("T");
    graph.add_edge(a, b, "to");
    let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "nodes": [
                { "id": "a", "types": [], "properties": {} },
                { "id": "b", "types": ["T"], "properties": {} },
            ],
            "edges": [
                { "label": "to", "from": "a", "to": "b", "properties": {} },
            ],
        })
    );
}

#[test]
fn handles_compare_by_identity() {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let graph = Arc::new(graph);
    assert_eq!(Graph::node(&graph, a), Graph::node(&graph, a));

    let mut other = Graph::new();
    let a2 = other.add_node("a");
    let other = Arc::new(other);
    assert_ne!(Graph::node(&graph, a), Graph::node(&other, a2));
}

#[test]
fn can_find_nodes() {
    let mut graph = Graph::new();
    graph.add_node("a");
    let b = graph.add_node("b");
    let graph = Arc::new(graph);
    assert_eq!(Graph::find_node(&graph, "b"), Some(Graph::node(&graph, b)));
    assert_eq!(Graph::find_node(&graph, "c"), None);
    assert_eq!(Graph::nodes(&graph).len(), 2);
}

/// ``` text
/// a -> c -> d
/// a -> b -> d
/// d -> a
/// ```
fn diamond() -> (Arc<Graph>, Vec<graphscript::graph::NodeRef>) {
    let mut graph = Graph::new();
    let a = graph.add_node("a");
    let b = graph.add_node("b");
    let c = graph.add_node("c");
    let d = graph.add_node("d");
    graph.add_edge(a, c, "x");
    graph.add_edge(a, b, "y");
    graph.add_edge(b, d, "x");
    graph.add_edge(c, d, "y");
    graph.add_edge(d, a, "back");
    (Arc::new(graph), vec![a, b, c, d])
}

#[test]
fn handles_map_back_to_references() {
    let (graph, refs) = diamond();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 5);
    let a = Graph::node(&graph, refs[0]);
    assert_eq!(a.node_ref(), refs[0]);
    let edge = a.outgoing().next().unwrap();
    assert_eq!(graph[edge.edge_ref()].label(), "x");
    assert_eq!(edge.sink().node_ref(), refs[2]);
}

#[test]
fn first_reachable_visits_edges_in_sink_order() {
    let (graph, refs) = diamond();
    let a = Graph::node(&graph, refs[0]);
    let mut visited = Vec::new();
    let found = a
        .first_reachable(
            |node| {
                visited.push(node.id().to_string());
                Ok::<_, Infallible>(node.id() == "d")
            },
            |_| Ok(true),
        )
        .unwrap();
    assert_eq!(found.map(|node| node.id().to_string()), Some("d".to_string()));
    assert_eq!(visited, vec!["a", "b", "d"]);
}

#[test]
fn first_reachable_terminates_on_cycles() {
    let (graph, refs) = diamond();
    let a = Graph::node(&graph, refs[0]);
    let mut count = 0;
    let found = a
        .first_reachable(
            |_| {
                count += 1;
                Ok::<_, Infallible>(false)
            },
            |_| Ok(true),
        )
        .unwrap();
    assert_eq!(found, None);
    assert_eq!(count, 4);
}

#[test]
fn first_reachable_propagates_errors() {
    let (graph, refs) = diamond();
    let a = Graph::node(&graph, refs[0]);
    let result = a.first_reachable(|_| Ok(false), |edge| Err(edge.label().to_string()));
    assert_eq!(result, Err("y".to_string()));
}

#[test]
fn instance_of_follows_labeled_edges_transitively() {
    let (graph, refs) = diamond();
    let a = Graph::node(&graph, refs[0]);
    let ids = |nodes: NodeSet| {
        let mut ids = nodes.iter().map(|n| n.id().to_string()).collect::<Vec<_>>();
        ids.sort();
        ids
    };
    assert_eq!(ids(a.instance_of("x")), vec!["a", "c"]);
    assert_eq!(ids(a.instance_of("missing")), vec!["a"]);
    let d = Graph::node(&graph, refs[3]);
    assert_eq!(ids(d.instance_of("back")), vec!["a", "d"]);
}

#[test]
fn can_walk_steps() {
    let (graph, refs) = diamond();
    let start = NodeSet::from(Graph::node(&graph, refs[0]));
    let mut walk = Walk::new()
        .step(|_| Ok::<_, Infallible>(true), |_| Ok(true))
        .step(|edge| Ok(edge.label() == "x"), |_| Ok(true));
    assert_eq!(walk.len(), 2);
    let result = walk.run(&start).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.first().map(|n| n.id()), Some("d"));

    let mut empty = Walk::<Infallible>::new();
    assert_eq!(empty.run(&start).unwrap(), start);
}

#[test]
fn single_walk_step_is_one_hop() {
    let (graph, refs) = diamond();
    let a = Graph::node(&graph, refs[0]);
    let mut walk = Walk::new().step(|_| Ok::<_, Infallible>(true), |node| Ok(node.id() != "b"));
    let result = walk.run(&NodeSet::from(a.clone())).unwrap();
    let expected = a
        .outgoing()
        .map(|edge| edge.sink())
        .filter(|node| node.id() != "b")
        .collect::<NodeSet>();
    assert_eq!(result, expected);
}
