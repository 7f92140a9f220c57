// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! This section defines the expression language implemented by this library.
//!
//! # Overview
//!
//! A script is a short program that queries a [property graph][`crate::graph::Graph`].  The host
//! binds a few variables, typically node sets that serve as starting points, and evaluates the
//! script to a single [value][`crate::Value`]:
//!
//! ``` text
//! doc = node.firstDoc(n -> n.value == "invoice");
//! doc.walk("hasLine", true, "hasAmount").length
//! ```
//!
//! Scripts never modify the graph.  The only state they change is the set of variables in scope.
//!
//! # Lexical structure
//!
//! Whitespace is insignificant, and `//` starts a comment that runs to the end of the line.
//! Identifiers start with an ASCII letter, `_`, or `$`, and continue with ASCII letters, digits,
//! `_`, or `$`.
//! The words `null`, `true`, and `false` are reserved.
//!
//! Numbers are written in decimal, with an optional leading `-`, fractional part, and exponent:
//! `1`, `-2.5`, `6.02e23`.  A number keeps the exact text that it was written with.
//!
//! Strings are delimited by either `"` or `'`.  The escape sequences `\0`, `\n`, `\r`, `\t`,
//! `\\`, `\"`, `\'`, `\/`, and `\uXXXX` are recognized.
//!
//! # Statements
//!
//! A script is a sequence of statements separated by `;`.  A trailing `;` is optional.  The value
//! of a script is the value of its last statement, or `null` if it has none.
//!
//! A sequence of statements enclosed in braces at statement position is a _block_.  A block opens
//! a new scope, so variables assigned inside it are not visible after it ends:
//!
//! ``` text
//! x = 1;
//! { x = 2; }
//! x            // 1
//! ```
//!
//! Parentheses group an expression without opening a scope:
//!
//! ``` text
//! x = 1;
//! (x = 2);
//! x            // 2
//! ```
//!
//! # Expressions
//!
//! In order of increasing precedence:
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `name = value`, `name := value` | assigns `value` to `name` in the current scope |
//! | `a \|\| b` | true if either operand is true; `b` is not evaluated if `a` is true |
//! | `a && b` | true if both operands are true; `b` is not evaluated if `a` is false |
//! | `a == b`, `a != b` | equality |
//! | `!a` | negation |
//! | `a.name` | selects a field or method of `a` |
//! | `a[i]` | indexes into `a` |
//! | `f(x, y)` | calls a function or closure |
//!
//! The logical operators always produce a boolean, whatever their operands are.
//!
//! Assignment always defines the variable in the innermost scope.  If an enclosing scope already
//! has a variable with the same name, the new variable shadows it.
//!
//! # Values
//!
//! | Kind | Written as | Truthiness |
//! |---|---|---|
//! | null | `null` | false |
//! | bool | `true`, `false` | itself |
//! | number | `42`, `-1.5` | nonzero |
//! | string | `"text"` | nonempty |
//! | string set | (from properties) | nonempty |
//! | list | (from hosts) | nonempty |
//! | node set | (from hosts and selectors) | nonempty |
//! | edge set | (from hosts and selectors) | nonempty |
//! | property map | (from `properties`) | nonempty |
//! | function | (from selectors) | false |
//! | closure | `n -> expr`, `{ ... }` | false |
//!
//! Booleans compare with `==` against the truthiness of the other operand.  Numbers and strings
//! compare against the string form of the other operand, so `1 == "1"` is true.  Collections
//! compare only with collections of the same kind: node sets and edge sets are equal when they
//! contain the same elements, in any order.  Comparing values that cannot be compared is an
//! error.
//!
//! Indexing a string set or a list with an integer returns the element at that position, or
//! `null` if there is none.  Indexing a property map with a string returns the property with that
//! key, or `null` if there is none.
//!
//! # Closures
//!
//! `name -> expr` creates a closure with one parameter.  The body may also be a block:
//! `n -> { t = n.type; t.has("Person") }`.  A block by itself in expression position, `{ ... }`,
//! is a closure with no parameter.
//!
//! A closure remembers the scope it was created in.  Each call evaluates the body in a new scope
//! nested inside that one, with the parameter bound to the argument:
//!
//! ``` text
//! target = "id2";
//! isTarget = n -> n.id == target;
//! node.firstReachable(isTarget)
//! ```
//!
//! Closures take at most one argument.  A missing argument is `null`.
//!
//! # Predicates
//!
//! The graph traversal methods take _predicates_ that decide which nodes and edges to visit.  A
//! predicate is one of:
//!
//!   - a closure, which is called with a single-element node set or edge set, and whose result is
//!     tested for truthiness
//!   - a string, which matches nodes with that id, or edges with that label
//!   - a boolean, which matches everything (`true`) or nothing (`false`)
//!
//! An error while evaluating a predicate stops the traversal, and becomes the error of the whole
//! script.
//!
//! The methods that are available on each kind of value are described in the
//! [functions][`crate::reference::functions`] section.

pub mod functions;
