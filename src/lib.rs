// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! This library implements a small embedded [expression language][language] for querying
//! property graphs.
//!
//! [language]: reference/index.html
//!
//! # Overview
//!
//! A [property graph][graph::Graph] consists of nodes and labeled edges, each of which can carry a
//! set of key/value properties.  Nodes additionally have an identifier, an optional label, any
//! number of type strings, and an optional scalar value.  Scripts written in this language select,
//! filter, and traverse the elements of such a graph:
//!
//! ``` text
//! root.walk("hasField", n -> n.type.has("Field")).length
//! ```
//!
//! Scripts are parsed into an [abstract syntax tree][ast::Script], which is evaluated directly
//! against a [`Scope`][] that the host has populated with values.  Graph elements, closures, and
//! native functions are all first-class [values][Value].
//!
//! ```
//! # use graphscript::Scope;
//! # fn main() -> Result<(), graphscript::Error> {
//! let scope = Scope::new();
//! scope.set("name", "abc");
//! let result = graphscript::evaluate_with(&scope, "name.length")?;
//! assert_eq!(result.as_string()?, "3");
//! # Ok(())
//! # }
//! ```

#[cfg(doc)]
pub mod reference;

pub mod ast;
mod execution;
pub mod functions;
pub mod graph;
pub mod parse_error;
mod parser;
mod selectors;
pub mod values;
mod variables;

pub use execution::error::ExecutionError;
pub use execution::CancellationError;
pub use execution::CancellationFlag;
pub use execution::ExecutionConfig;
pub use execution::ExecutionContext;
pub use execution::NoCancellation;
pub use execution::DEFAULT_DOCUMENT_NODE_TYPE;
pub use execution::DEFAULT_INSTANCE_OF_LABEL;
pub use parser::Location;
pub use parser::ParseError;
pub use values::Value;
pub use variables::Scope;
pub use variables::VariableError;

use std::borrow::Borrow;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

/// An identifier that appears in a script, or that names a variable in a [`Scope`][].
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Identifier(Arc<String>);

impl Identifier {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_string(self) -> String {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Identifier {
    type Target = str;
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Identifier {
        Identifier(Arc::new(String::from(value)))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Identifier {
        Identifier(Arc::new(value))
    }
}

impl Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<'a> PartialEq<&'a str> for Identifier {
    fn eq(&self, other: &&'a str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An error that can occur while parsing or evaluating a script
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Parses a script into a syntax tree that can be evaluated any number of times.
pub fn parse(source: &str) -> Result<ast::Script, ParseError> {
    ast::Script::parse(source)
}

/// Parses and evaluates a script in a fresh root scope.
pub fn evaluate(source: &str) -> Result<Value, Error> {
    evaluate_with(&Scope::new(), source)
}

/// Parses and evaluates a script in an existing scope.  Any variables that the script assigns at
/// its top level are left in `scope` afterwards.
pub fn evaluate_with(scope: &Scope, source: &str) -> Result<Value, Error> {
    let script = parse(source)?;
    Ok(script.evaluate(scope)?)
}
