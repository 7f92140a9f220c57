// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! The named fields and methods of each kind of value.  Adding a selector means adding an entry
//! to one of these tables.

use crate::execution::error::ExecutionError;
use crate::functions::stdlib;
use crate::functions::NativeFunction;
use crate::graph::Edge;
use crate::graph::EdgeSet;
use crate::graph::Node;
use crate::graph::NodeSet;
use crate::graph::PropertyMap;
use crate::values::Value;

type Selector<T> = fn(&T) -> Result<Value, ExecutionError>;

static STRING_SELECTORS: &[(&str, Selector<String>)] = &[
    ("length", |s| Ok(s.chars().count().into())),
    ("matches", |s| {
        Ok(NativeFunction::new(
            "matches",
            1,
            Some(1),
            stdlib::string::Matches { value: s.clone() },
        )
        .into())
    }),
];

static STRING_SET_SELECTORS: &[(&str, Selector<Vec<String>>)] = &[
    ("length", |values| Ok(values.len().into())),
    ("has", |values| {
        Ok(NativeFunction::new(
            "has",
            1,
            Some(1),
            stdlib::string::Has {
                values: values.clone(),
            },
        )
        .into())
    }),
    ("hasAny", |values| {
        Ok(NativeFunction::new(
            "hasAny",
            0,
            None,
            stdlib::string::HasAny {
                values: values.clone(),
            },
        )
        .into())
    }),
    ("hasAll", |values| {
        Ok(NativeFunction::new(
            "hasAll",
            0,
            None,
            stdlib::string::HasAll {
                values: values.clone(),
            },
        )
        .into())
    }),
];

static NODE_SET_SELECTORS: &[(&str, Selector<NodeSet>)] = &[
    ("length", |nodes| Ok(nodes.len().into())),
    ("id", |nodes| Ok(one_node(nodes)?.id().into())),
    ("label", |nodes| Ok(one_node(nodes)?.label().into())),
    ("type", |nodes| Ok(one_node(nodes)?.types().to_vec().into())),
    ("value", |nodes| Ok(one_node(nodes)?.value().into())),
    ("properties", |nodes| {
        Ok(PropertyMap::Node(one_node(nodes)?.clone()).into())
    }),
    ("firstReachable", first_reachable),
    ("first", first_reachable),
    ("firstDoc", |nodes| {
        Ok(NativeFunction::new(
            "firstDoc",
            1,
            Some(1),
            stdlib::graph::FirstDoc {
                nodes: nodes.clone(),
            },
        )
        .into())
    }),
    ("instanceOf", |nodes| {
        Ok(NativeFunction::new(
            "instanceOf",
            1,
            Some(1),
            stdlib::graph::InstanceOf {
                nodes: nodes.clone(),
            },
        )
        .into())
    }),
    ("walk", |nodes| {
        Ok(NativeFunction::new(
            "walk",
            0,
            None,
            stdlib::graph::Walk {
                nodes: nodes.clone(),
            },
        )
        .into())
    }),
];

static EDGE_SET_SELECTORS: &[(&str, Selector<EdgeSet>)] = &[
    ("length", |edges| Ok(edges.len().into())),
    ("label", |edges| Ok(one_edge(edges)?.label().into())),
    ("from", |edges| Ok(NodeSet::from(one_edge(edges)?.source()).into())),
    ("to", |edges| Ok(NodeSet::from(one_edge(edges)?.sink()).into())),
    ("properties", |edges| {
        Ok(PropertyMap::Edge(one_edge(edges)?.clone()).into())
    }),
];

static PROPERTY_MAP_SELECTORS: &[(&str, Selector<PropertyMap>)] =
    &[("length", |map| Ok(map.properties().len().into()))];

static LIST_SELECTORS: &[(&str, Selector<Vec<Value>>)] =
    &[("length", |values| Ok(values.len().into()))];

fn first_reachable(nodes: &NodeSet) -> Result<Value, ExecutionError> {
    Ok(NativeFunction::new(
        "firstReachable",
        1,
        Some(2),
        stdlib::graph::FirstReachable {
            nodes: nodes.clone(),
        },
    )
    .into())
}

fn one_node(nodes: &NodeSet) -> Result<&Node, ExecutionError> {
    match nodes.len() {
        0 => Err(ExecutionError::NoNodesInResult),
        1 => nodes.first().ok_or(ExecutionError::NoNodesInResult),
        _ => Err(ExecutionError::MultipleNodesInResult),
    }
}

fn one_edge(edges: &EdgeSet) -> Result<&Edge, ExecutionError> {
    match edges.len() {
        0 => Err(ExecutionError::NoEdgesInResult),
        1 => edges.first().ok_or(ExecutionError::NoEdgesInResult),
        _ => Err(ExecutionError::MultipleEdgesInResult),
    }
}

fn lookup<T>(
    table: &[(&str, Selector<T>)],
    receiver: &T,
    name: &str,
) -> Option<Result<Value, ExecutionError>> {
    table
        .iter()
        .find(|(selector, _)| *selector == name)
        .map(|(_, select)| select(receiver))
}

pub(crate) fn select(value: &Value, name: &str) -> Result<Value, ExecutionError> {
    let selected = match value {
        Value::String(string) => lookup(STRING_SELECTORS, string, name),
        Value::StringSet(values) => lookup(STRING_SET_SELECTORS, values, name),
        Value::NodeSet(nodes) => lookup(NODE_SET_SELECTORS, nodes, name),
        Value::EdgeSet(edges) => lookup(EDGE_SET_SELECTORS, edges, name),
        Value::PropertyMap(map) => lookup(PROPERTY_MAP_SELECTORS, map, name),
        Value::List(values) => lookup(LIST_SELECTORS, values, name),
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Function(_)
        | Value::Closure(_)
        | Value::LValue(_) => None,
    };
    selected.unwrap_or_else(|| {
        Err(ExecutionError::UnknownSelector {
            selector: name.to_string(),
            value: value.type_name(),
        })
    })
}
