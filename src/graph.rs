// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Defines the in-memory property graph that scripts query.
//!
//! A [`Graph`][] is built up mutably, and then frozen into an [`Arc`][] so that scripts can refer
//! to its elements through cheap [`Node`][] and [`Edge`][] handles.  Scripts never change the
//! structure of the graph; they only query it.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::iter::FromIterator;
use std::ops::Index;
use std::ops::IndexMut;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::ser;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::Serialize;
use smallvec::SmallVec;

/// A property graph that scripts can be evaluated against.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

type NodeID = u32;
type EdgeID = u32;

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Graph {
        Graph::default()
    }

    /// Adds a new node with the given identifier to the graph, returning a reference to it.
    pub fn add_node<S: Into<String>>(&mut self, id: S) -> NodeRef {
        let index = self.nodes.len() as NodeID;
        self.nodes.push(GraphNode::new(id.into()));
        NodeRef(index)
    }

    /// Adds a new labeled edge between two nodes, returning a reference to it.  Unlike nodes,
    /// there can be any number of edges connecting the same pair of nodes.
    pub fn add_edge<S: Into<String>>(&mut self, source: NodeRef, sink: NodeRef, label: S) -> EdgeRef {
        let index = self.edges.len() as EdgeID;
        self.edges.push(GraphEdge {
            label: label.into(),
            source: source.0,
            sink: sink.0,
            properties: Properties::new(),
        });
        self.nodes[source.0 as usize].outgoing_edges.push(index);
        self.nodes[sink.0 as usize].incoming_edges.push(index);
        EdgeRef(index)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns a handle to a node of a frozen graph.
    pub fn node(graph: &Arc<Graph>, node: NodeRef) -> Node {
        Node {
            graph: graph.clone(),
            index: node.0,
        }
    }

    /// Returns a handle to an edge of a frozen graph.
    pub fn edge(graph: &Arc<Graph>, edge: EdgeRef) -> Edge {
        Edge {
            graph: graph.clone(),
            index: edge.0,
        }
    }

    /// Returns every node of a frozen graph, in the order they were added.
    pub fn nodes(graph: &Arc<Graph>) -> NodeSet {
        (0..graph.nodes.len() as NodeID)
            .map(|index| Graph::node(graph, NodeRef(index)))
            .collect()
    }

    /// Returns the first node of a frozen graph with the given identifier, if there is one.
    pub fn find_node(graph: &Arc<Graph>, id: &str) -> Option<Node> {
        graph
            .nodes
            .iter()
            .position(|node| node.id == id)
            .map(|index| Graph::node(graph, NodeRef(index as NodeID)))
    }

    /// Renders the graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Index<NodeRef> for Graph {
    type Output = GraphNode;
    fn index(&self, index: NodeRef) -> &GraphNode {
        &self.nodes[index.0 as usize]
    }
}

impl IndexMut<NodeRef> for Graph {
    fn index_mut(&mut self, index: NodeRef) -> &mut GraphNode {
        &mut self.nodes[index.0 as usize]
    }
}

impl Index<EdgeRef> for Graph {
    type Output = GraphEdge;
    fn index(&self, index: EdgeRef) -> &GraphEdge {
        &self.edges[index.0 as usize]
    }
}

impl IndexMut<EdgeRef> for Graph {
    fn index_mut(&mut self, index: EdgeRef) -> &mut GraphEdge {
        &mut self.edges[index.0 as usize]
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "node {}", node.id)?;
            if let Some(label) = &node.label {
                writeln!(f, "  label: {:?}", label)?;
            }
            if !node.types.is_empty() {
                writeln!(f, "  types: {:?}", node.types)?;
            }
            if let Some(value) = &node.value {
                writeln!(f, "  value: {:?}", value)?;
            }
            write!(f, "{}", node.properties)?;
            for edge in &node.outgoing_edges {
                let edge = &self.edges[*edge as usize];
                writeln!(
                    f,
                    "edge {} -> {} {:?}",
                    node.id, self.nodes[edge.sink as usize].id, edge.label
                )?;
                write!(f, "{}", edge.properties)?;
            }
        }
        Ok(())
    }
}

impl ser::Serialize for Graph {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        struct Nodes<'a>(&'a Graph);
        struct Edges<'a>(&'a Graph);

        impl ser::Serialize for Nodes<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut seq = serializer.serialize_seq(Some(self.0.nodes.len()))?;
                for node in &self.0.nodes {
                    seq.serialize_element(&SerializeNode {
                        id: &node.id,
                        label: node.label.as_deref(),
                        types: &node.types,
                        value: node.value.as_deref(),
                        properties: &node.properties,
                    })?;
                }
                seq.end()
            }
        }

        impl ser::Serialize for Edges<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let graph = self.0;
                let mut seq = serializer.serialize_seq(Some(graph.edges.len()))?;
                for edge in &graph.edges {
                    seq.serialize_element(&SerializeEdge {
                        label: &edge.label,
                        from: &graph.nodes[edge.source as usize].id,
                        to: &graph.nodes[edge.sink as usize].id,
                        properties: Some(&edge.properties),
                    })?;
                }
                seq.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("nodes", &Nodes(self))?;
        map.serialize_entry("edges", &Edges(self))?;
        map.end()
    }
}

// serializing through helper structs so that node and edge handles don't need their own
// serialization formats
#[derive(Serialize)]
struct SerializeNode<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    types: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
    properties: &'a Properties,
}

#[derive(Serialize)]
struct SerializeEdge<'a> {
    label: &'a str,
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a Properties>,
}

/// A reference to a node while its graph is being built
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeRef(NodeID);

/// A reference to an edge while its graph is being built
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EdgeRef(EdgeID);

/// The content of a single graph node
pub struct GraphNode {
    id: String,
    pub label: Option<String>,
    pub types: Vec<String>,
    pub value: Option<String>,
    pub properties: Properties,
    outgoing_edges: SmallVec<[EdgeID; 8]>,
    incoming_edges: SmallVec<[EdgeID; 8]>,
}

impl GraphNode {
    fn new(id: String) -> GraphNode {
        GraphNode {
            id,
            label: None,
            types: Vec::new(),
            value: None,
            properties: Properties::new(),
            outgoing_edges: SmallVec::new(),
            incoming_edges: SmallVec::new(),
        }
    }

    /// Returns the identifier of this node.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Adds a type to this node, unless it already has it.
    pub fn add_type<S: Into<String>>(&mut self, ty: S) {
        let ty = ty.into();
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
    }
}

/// The content of a single graph edge
pub struct GraphEdge {
    label: String,
    source: NodeID,
    sink: NodeID,
    pub properties: Properties,
}

impl GraphEdge {
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A set of properties associated with a graph node or edge
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Properties {
    values: SmallVec<[(String, PropertyValue); 8]>,
}

impl Properties {
    /// Creates a new, empty set of properties.
    pub fn new() -> Properties {
        Properties::default()
    }

    /// Adds a property to this property set.  If there was already a property with the same
    /// key, replaces its value and returns `Err`.
    pub fn add<K: Into<String>, V: Into<PropertyValue>>(&mut self, key: K, value: V) -> Result<(), ()> {
        let key = key.into();
        match self
            .values
            .binary_search_by(|(probe, _)| probe.as_str().cmp(&key))
        {
            Ok(index) => {
                self.values[index].1 = value.into();
                Err(())
            }
            Err(index) => {
                self.values.insert(index, (key, value.into()));
                Ok(())
            }
        }
    }

    /// Returns the value of a particular property, if it exists.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values
            .binary_search_by(|(probe, _)| probe.as_str().cmp(key))
            .ok()
            .map(|index| &self.values[index].1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (key, value) in &self.values {
            writeln!(f, "  {}: {}", key, value)?;
        }
        Ok(())
    }
}

impl ser::Serialize for Properties {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The value of a node or edge property
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    StringSet(Vec<String>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyValue::String(value) => write!(f, "{:?}", value),
            PropertyValue::StringSet(values) => write!(f, "{:?}", values),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> PropertyValue {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> PropertyValue {
        PropertyValue::String(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> PropertyValue {
        PropertyValue::StringSet(value)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(value: Vec<&str>) -> PropertyValue {
        PropertyValue::StringSet(value.into_iter().map(String::from).collect())
    }
}

/// A read-only view of the properties of a node, an edge, or a free-standing property set
#[derive(Clone, Debug)]
pub enum PropertyMap {
    Node(Node),
    Edge(Edge),
    Detached(Arc<Properties>),
}

impl PropertyMap {
    pub fn properties(&self) -> &Properties {
        match self {
            PropertyMap::Node(node) => node.properties(),
            PropertyMap::Edge(edge) => edge.properties(),
            PropertyMap::Detached(properties) => properties,
        }
    }
}

impl PartialEq for PropertyMap {
    fn eq(&self, other: &PropertyMap) -> bool {
        self.properties() == other.properties()
    }
}

impl From<Properties> for PropertyMap {
    fn from(value: Properties) -> PropertyMap {
        PropertyMap::Detached(Arc::new(value))
    }
}

/// A handle to a node of a frozen graph.  Two handles are equal when they refer to the same node
/// of the same graph.
#[derive(Clone)]
pub struct Node {
    graph: Arc<Graph>,
    index: NodeID,
}

impl Node {
    fn data(&self) -> &GraphNode {
        &self.graph.nodes[self.index as usize]
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef(self.index)
    }

    pub fn id(&self) -> &str {
        &self.data().id
    }

    pub fn label(&self) -> Option<&str> {
        self.data().label.as_deref()
    }

    pub fn types(&self) -> &[String] {
        &self.data().types
    }

    pub fn has_type(&self, ty: &str) -> bool {
        self.types().iter().any(|t| t == ty)
    }

    pub fn value(&self) -> Option<&str> {
        self.data().value.as_deref()
    }

    pub fn properties(&self) -> &Properties {
        &self.data().properties
    }

    /// Iterates over the edges leaving this node, in the order they were added.
    pub fn outgoing(&self) -> impl Iterator<Item = Edge> + '_ {
        self.data().outgoing_edges.iter().map(move |index| Edge {
            graph: self.graph.clone(),
            index: *index,
        })
    }

    /// Iterates over the edges arriving at this node, in the order they were added.
    pub fn incoming(&self) -> impl Iterator<Item = Edge> + '_ {
        self.data().incoming_edges.iter().map(move |index| Edge {
            graph: self.graph.clone(),
            index: *index,
        })
    }

    /// The outgoing edges of this node, ordered by the index of the node they point to.
    fn edges_by_sink(&self) -> std::vec::IntoIter<Edge> {
        let mut edges = self.outgoing().collect::<Vec<_>>();
        edges.sort_by_key(|edge| edge.sink_index());
        edges.into_iter()
    }

    /// Performs a depth-first search starting at this node, and returns the first node that
    /// satisfies `node_predicate`.  The starting node is tested first.  An edge is only followed
    /// if it satisfies `edge_predicate`; outgoing edges are visited in the order of the nodes that
    /// they point to.  Each node is visited at most once.  If either predicate fails, the search
    /// stops and the failure is returned.
    pub fn first_reachable<E, N, F>(
        &self,
        mut node_predicate: N,
        mut edge_predicate: F,
    ) -> Result<Option<Node>, E>
    where
        N: FnMut(&Node) -> Result<bool, E>,
        F: FnMut(&Edge) -> Result<bool, E>,
    {
        let mut seen = HashSet::new();
        seen.insert(self.index);
        if node_predicate(self)? {
            return Ok(Some(self.clone()));
        }
        let mut stack = vec![self.edges_by_sink()];
        while let Some(edges) = stack.last_mut() {
            let edge = match edges.next() {
                Some(edge) => edge,
                None => {
                    stack.pop();
                    continue;
                }
            };
            if seen.contains(&edge.data().sink) || !edge_predicate(&edge)? {
                continue;
            }
            let node = edge.sink();
            seen.insert(node.index);
            if node_predicate(&node)? {
                return Ok(Some(node));
            }
            stack.push(node.edges_by_sink());
        }
        Ok(None)
    }

    /// Returns every node reachable from this one by following only edges with the given label.
    /// The result includes this node itself.
    pub fn instance_of(&self, label: &str) -> NodeSet {
        let mut result = NodeSet::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if result.contains(&node) {
                continue;
            }
            stack.extend(
                node.outgoing()
                    .filter(|edge| edge.label() == label)
                    .map(|edge| edge.sink()),
            );
            result.insert(node);
        }
        result
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.index == other.index
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.graph) as usize).hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node({:?})", self.id())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl ser::Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

/// A handle to an edge of a frozen graph.  Two handles are equal when they refer to the same
/// edge of the same graph.
#[derive(Clone)]
pub struct Edge {
    graph: Arc<Graph>,
    index: EdgeID,
}

impl Edge {
    fn data(&self) -> &GraphEdge {
        &self.graph.edges[self.index as usize]
    }

    pub fn edge_ref(&self) -> EdgeRef {
        EdgeRef(self.index)
    }

    pub fn label(&self) -> &str {
        &self.data().label
    }

    pub fn source(&self) -> Node {
        Node {
            graph: self.graph.clone(),
            index: self.data().source,
        }
    }

    pub fn sink(&self) -> Node {
        Node {
            graph: self.graph.clone(),
            index: self.data().sink,
        }
    }

    fn sink_index(&self) -> NodeID {
        self.data().sink
    }

    pub fn properties(&self) -> &Properties {
        &self.data().properties
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Edge) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph) && self.index == other.index
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.graph) as usize).hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Edge({:?} -> {:?} {:?})",
            self.source().id(),
            self.sink().id(),
            self.label()
        )
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -{}-> {}", self.source(), self.label(), self.sink())
    }
}

impl ser::Serialize for Edge {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let source = self.source();
        let sink = self.sink();
        SerializeEdge {
            label: self.label(),
            from: source.id(),
            to: sink.id(),
            properties: None,
        }
        .serialize(serializer)
    }
}

/// A deduplicated, insertion-ordered set of nodes.  Equality compares contents, not order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeSet(IndexSet<Node>);

impl NodeSet {
    pub fn new() -> NodeSet {
        NodeSet::default()
    }

    /// Adds a node to the set, returning whether it was new.
    pub fn insert(&mut self, node: Node) -> bool {
        self.0.insert(node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.0.contains(node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Node> {
        self.0.first()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Node> {
        self.0.iter()
    }

    /// Returns a new set containing the nodes of both sets, this set's nodes first.
    pub fn union(&self, other: &NodeSet) -> NodeSet {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl From<Node> for NodeSet {
    fn from(node: Node) -> NodeSet {
        std::iter::once(node).collect()
    }
}

impl FromIterator<Node> for NodeSet {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> NodeSet {
        NodeSet(iter.into_iter().collect())
    }
}

impl Extend<Node> for NodeSet {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = indexmap::set::Iter<'a, Node>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl ser::Serialize for NodeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// A deduplicated, insertion-ordered set of edges.  Equality compares contents, not order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EdgeSet(IndexSet<Edge>);

impl EdgeSet {
    pub fn new() -> EdgeSet {
        EdgeSet::default()
    }

    /// Adds an edge to the set, returning whether it was new.
    pub fn insert(&mut self, edge: Edge) -> bool {
        self.0.insert(edge)
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.0.contains(edge)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Edge> {
        self.0.first()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Edge> {
        self.0.iter()
    }

    /// Returns a new set containing the edges of both sets, this set's edges first.
    pub fn union(&self, other: &EdgeSet) -> EdgeSet {
        self.iter().chain(other.iter()).cloned().collect()
    }
}

impl From<Edge> for EdgeSet {
    fn from(edge: Edge) -> EdgeSet {
        std::iter::once(edge).collect()
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> EdgeSet {
        EdgeSet(iter.into_iter().collect())
    }
}

impl Extend<Edge> for EdgeSet {
    fn extend<I: IntoIterator<Item = Edge>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<'a> IntoIterator for &'a EdgeSet {
    type Item = &'a Edge;
    type IntoIter = indexmap::set::Iter<'a, Edge>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl ser::Serialize for EdgeSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

type EdgeFilter<'a, E> = Box<dyn FnMut(&Edge) -> Result<bool, E> + 'a>;
type NodeFilter<'a, E> = Box<dyn FnMut(&Node) -> Result<bool, E> + 'a>;

/// A multi-hop traversal.  Each step follows the outgoing edges that satisfy its edge filter, and
/// keeps the nodes they point to that satisfy its node filter.
pub struct Walk<'a, E> {
    steps: Vec<(EdgeFilter<'a, E>, NodeFilter<'a, E>)>,
}

impl<'a, E> Walk<'a, E> {
    /// Creates a walk with no steps, which leads from a set of nodes to that same set.
    pub fn new() -> Walk<'a, E> {
        Walk { steps: Vec::new() }
    }

    /// Appends a step to this walk.
    pub fn step<F, N>(mut self, edge_filter: F, node_filter: N) -> Walk<'a, E>
    where
        F: FnMut(&Edge) -> Result<bool, E> + 'a,
        N: FnMut(&Node) -> Result<bool, E> + 'a,
    {
        self.steps.push((Box::new(edge_filter), Box::new(node_filter)));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Follows every step of the walk from each of the `start` nodes, returning the nodes reached
    /// by the final step.
    pub fn run(&mut self, start: &NodeSet) -> Result<NodeSet, E> {
        let mut current = start.clone();
        for (edge_filter, node_filter) in self.steps.iter_mut() {
            let mut next = NodeSet::new();
            for node in &current {
                let mut edges = Vec::new();
                for edge in node.outgoing() {
                    if edge_filter(&edge)? {
                        edges.push(edge);
                    }
                }
                edges.sort_by_key(|edge| edge.sink_index());
                for edge in edges {
                    let sink = edge.sink();
                    if !next.contains(&sink) && node_filter(&sink)? {
                        next.insert(sink);
                    }
                }
            }
            current = next;
        }
        Ok(current)
    }
}

impl<'a, E> Default for Walk<'a, E> {
    fn default() -> Walk<'a, E> {
        Walk::new()
    }
}
