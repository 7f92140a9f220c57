// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! This section defines the selectors that are available on each kind of value.
//!
//! Selecting a name that a value does not support is an error.  Selectors marked as methods
//! return a function, which must be called: `nodes.instanceOf("Person")`.
//!
//! # Strings
//!
//! ## `length`
//!
//! The number of characters in the string.
//!
//! ## `matches` (method)
//!
//! Tests the string against a regular expression.
//!
//!   - Input parameters:
//!     - `pattern`: a string defining the regular expression to search for
//!   - Output: `true` if any part of the string matches
//!
//! Note that the regular expression syntax that we support is exactly that used by Rust's
//! [`regex`][] crate.  In particular, the `pattern` is passed in to [`Regex::new`][].
//!
//! [`regex`]: https://docs.rs/regex/
//! [`Regex::new`]: https://docs.rs/regex/*/regex/struct.Regex.html#method.new
//!
//! # String sets
//!
//! ## `length`
//!
//! The number of strings in the set.
//!
//! ## `has` (method)
//!
//!   - Input parameters: a string
//!   - Output: `true` if the set contains the string
//!
//! ## `hasAny` (method)
//!
//!   - Input parameters: zero or more strings or string sets
//!   - Output: `true` if the set contains any of the strings
//!
//! ## `hasAll` (method)
//!
//!   - Input parameters: zero or more strings or string sets
//!   - Output: `true` if the set contains all of the strings
//!
//! # Node sets
//!
//! The fields `id`, `label`, `type`, `value`, and `properties` require the node set to contain
//! exactly one node.
//!
//! ## `length`
//!
//! The number of nodes in the set.
//!
//! ## `id`
//!
//! The identifier of the node, as a string.
//!
//! ## `label`, `value`
//!
//! The label or value of the node, as a string, or `null` if the node has none.
//!
//! ## `type`
//!
//! The types of the node, as a string set.
//!
//! ## `properties`
//!
//! The properties of the node, as a property map.
//!
//! ## `firstReachable` (method), `first` (method)
//!
//! Searches the graph depth-first from each node in the set, in order, and returns the first
//! node that satisfies a predicate.  The starting node is tested too.
//!
//!   - Input parameters:
//!     - `nodePredicate`: the predicate that the result must satisfy
//!     - `edgePredicate` (optional): the predicate that each followed edge must satisfy;
//!       defaults to following every edge
//!   - Output: a node set with the first matching node, or an empty node set
//!
//! ## `firstDoc` (method)
//!
//! Like `firstReachable`, but only returns document nodes, and never follows instance-of
//! edges.  The document node type and the instance-of edge label are part of the
//! [`ExecutionConfig`][`crate::ExecutionConfig`].
//!
//!   - Input parameters:
//!     - `nodePredicate`: the predicate that the result must satisfy
//!   - Output: a node set with the first matching document node, or an empty node set
//!
//! ## `instanceOf` (method)
//!
//! Filters the set to the nodes that are instances of a given node, following instance-of edges
//! transitively.  Every node is an instance of itself.
//!
//!   - Input parameters:
//!     - `id`: the identifier of the node to test against
//!   - Output: the matching subset of this node set
//!
//! ## `walk` (method)
//!
//! Follows a path of steps from every node in the set.  Each step is a pair of predicates: the
//! first selects which outgoing edges to follow, and the second selects which of the nodes that
//! they lead to to keep.  A trailing edge predicate without a node predicate keeps every node.
//!
//!   - Input parameters: `edgePredicate1, nodePredicate1, edgePredicate2, nodePredicate2, ...`
//!   - Output: the nodes reached by the last step; with no steps, this node set
//!
//! # Edge sets
//!
//! The fields `label`, `from`, `to`, and `properties` require the edge set to contain exactly one
//! edge.
//!
//! ## `length`
//!
//! The number of edges in the set.
//!
//! ## `label`
//!
//! The label of the edge, as a string.
//!
//! ## `from`, `to`
//!
//! The source or sink node of the edge, as a node set.
//!
//! ## `properties`
//!
//! The properties of the edge, as a property map.
//!
//! # Property maps and lists
//!
//! ## `length`
//!
//! The number of entries.
