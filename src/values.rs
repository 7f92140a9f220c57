// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Defines the values that scripts compute with

use std::fmt;

use serde::ser;
use serde::ser::SerializeMap;
use serde::Serialize;

use crate::execution::error::ExecutionError;
use crate::functions::Closure;
use crate::functions::NativeFunction;
use crate::graph::Edge;
use crate::graph::EdgeSet;
use crate::graph::Node;
use crate::graph::NodeSet;
use crate::graph::Properties;
use crate::graph::PropertyMap;
use crate::graph::PropertyValue;
use crate::selectors;
use crate::ExecutionContext;
use crate::Identifier;

/// A number, kept in the exact decimal form that it was written or converted in
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Number(String);

impl Number {
    /// Wraps the text of a number literal that the parser has already validated.
    pub(crate) fn from_literal(text: &str) -> Number {
        Number(text.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns this number as an integer, if it is written as one.
    pub fn as_integer(&self) -> Result<i64, ExecutionError> {
        self.0
            .parse()
            .map_err(|_| ExecutionError::NotANumber(self.0.clone()))
    }

    /// A number is true when it is nonzero.
    pub fn as_bool(&self) -> Result<bool, ExecutionError> {
        let value: f64 = self
            .0
            .parse()
            .map_err(|_| ExecutionError::NotANumber(self.0.clone()))?;
        Ok(value != 0.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Number {
                    Number(value.to_string())
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    Value::Number(value.into())
                }
            }
        )*
    };
}

number_from!(i32, i64, u32, u64, usize);

/// Non-finite floats have no decimal form, and become `Null`.
impl From<f64> for Value {
    fn from(value: f64) -> Value {
        if value.is_finite() {
            Value::Number(Number(value.to_string()))
        } else {
            Value::Null
        }
    }
}

/// A value that a script expression can evaluate to
#[derive(Clone, Debug)]
pub enum Value {
    // Scalar
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    // Compound
    StringSet(Vec<String>),
    List(Vec<Value>),
    // Graph
    NodeSet(NodeSet),
    EdgeSet(EdgeSet),
    PropertyMap(PropertyMap),
    // Callables
    Function(NativeFunction),
    Closure(Closure),
    // Assignment targets
    LValue(Identifier),
}

impl Value {
    /// Returns a short description of the kind of this value, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::StringSet(_) => "string set",
            Value::List(_) => "list",
            Value::NodeSet(_) => "node set",
            Value::EdgeSet(_) => "edge set",
            Value::PropertyMap(_) => "property map",
            Value::Function(_) => "function",
            Value::Closure(_) => "closure",
            Value::LValue(_) => "lvalue",
        }
    }

    /// Looks up a named field or method of this value.
    pub fn selector(&self, name: &str) -> Result<Value, ExecutionError> {
        selectors::select(self, name)
    }

    /// Accesses an element of this value by position or by key.  Positions past either end of a
    /// sequence yield `Null`, as do missing keys.
    pub fn index(&self, index: &Value) -> Result<Value, ExecutionError> {
        fn position(index: &Value, len: usize) -> Result<Option<usize>, ExecutionError> {
            let index = index.as_int()?;
            if index < 0 || index as usize >= len {
                Ok(None)
            } else {
                Ok(Some(index as usize))
            }
        }

        match self {
            Value::StringSet(values) => Ok(position(index, values.len())?
                .map_or(Value::Null, |i| Value::String(values[i].clone()))),
            Value::List(values) => {
                Ok(position(index, values.len())?.map_or(Value::Null, |i| values[i].clone()))
            }
            Value::PropertyMap(map) => {
                let key = index.as_string()?;
                Ok(map.properties().get(&key).map_or(Value::Null, Value::from))
            }
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::NodeSet(_)
            | Value::EdgeSet(_)
            | Value::Function(_)
            | Value::Closure(_)
            | Value::LValue(_) => Err(ExecutionError::NotIndexable(self.type_name())),
        }
    }

    /// Calls this value with the given arguments.  Only functions and closures can be called.
    pub fn call(&self, exec: &ExecutionContext, args: Vec<Value>) -> Result<Value, ExecutionError> {
        match self {
            Value::Function(function) => function.call(exec, args),
            Value::Closure(closure) => closure.call(exec, args),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::StringSet(_)
            | Value::List(_)
            | Value::NodeSet(_)
            | Value::EdgeSet(_)
            | Value::PropertyMap(_)
            | Value::LValue(_) => Err(ExecutionError::NotCallable(self.type_name())),
        }
    }

    /// Compares this value with another, the way that the `==` operator does.  Booleans compare
    /// against the other value's truthiness; numbers and strings compare against the other
    /// value's string form; collections only compare against collections of the same kind.
    pub fn equals(&self, other: &Value) -> Result<bool, ExecutionError> {
        let incomparable = || ExecutionError::Incomparable(self.type_name(), other.type_name());
        match self {
            Value::Null => Ok(matches!(other, Value::Null)),
            Value::Bool(value) => Ok(*value == other.as_bool()?),
            Value::Number(value) => Ok(value.as_str() == other.as_string()?),
            Value::String(value) => Ok(*value == other.as_string()?),
            Value::StringSet(values) => match other {
                Value::StringSet(others) => Ok(values == others),
                _ => Err(incomparable()),
            },
            Value::NodeSet(nodes) => match other {
                Value::NodeSet(others) => Ok(nodes == others),
                _ => Err(incomparable()),
            },
            Value::EdgeSet(edges) => match other {
                Value::EdgeSet(others) => Ok(edges == others),
                _ => Err(incomparable()),
            },
            Value::PropertyMap(map) => match other {
                Value::PropertyMap(other) => Ok(map == other),
                _ => Err(incomparable()),
            },
            Value::Function(_) => Ok(false),
            Value::List(_) | Value::Closure(_) | Value::LValue(_) => Err(incomparable()),
        }
    }

    /// Coerces this value into a boolean.  Collections are true when they are nonempty.
    pub fn as_bool(&self) -> Result<bool, ExecutionError> {
        match self {
            Value::Null => Ok(false),
            Value::Bool(value) => Ok(*value),
            Value::Number(value) => value.as_bool(),
            Value::String(value) => Ok(!value.is_empty()),
            Value::StringSet(values) => Ok(!values.is_empty()),
            Value::List(values) => Ok(!values.is_empty()),
            Value::NodeSet(nodes) => Ok(!nodes.is_empty()),
            Value::EdgeSet(edges) => Ok(!edges.is_empty()),
            Value::PropertyMap(map) => Ok(!map.properties().is_empty()),
            Value::Function(_) | Value::Closure(_) | Value::LValue(_) => Ok(false),
        }
    }

    /// Coerces this value into an integer.
    pub fn as_int(&self) -> Result<i64, ExecutionError> {
        match self {
            Value::Bool(value) => Ok(*value as i64),
            Value::Number(value) => value.as_integer(),
            Value::String(value) => value
                .parse()
                .map_err(|_| ExecutionError::NotANumber(value.clone())),
            Value::Null
            | Value::StringSet(_)
            | Value::List(_)
            | Value::NodeSet(_)
            | Value::EdgeSet(_)
            | Value::PropertyMap(_)
            | Value::Function(_)
            | Value::Closure(_)
            | Value::LValue(_) => Err(ExecutionError::NotANumber(self.type_name().to_string())),
        }
    }

    /// Coerces this value into a string.  Graph elements and callables have no string form.
    pub fn as_string(&self) -> Result<String, ExecutionError> {
        match self {
            Value::Null => Ok("null".to_string()),
            Value::Bool(value) => Ok(value.to_string()),
            Value::Number(value) => Ok(value.as_str().to_string()),
            Value::String(value) => Ok(value.clone()),
            Value::StringSet(values) => Ok(format!("[{}]", values.join(" "))),
            Value::List(values) => {
                let strings = values
                    .iter()
                    .map(Value::as_string)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", strings.join(" ")))
            }
            Value::LValue(name) => Ok(name.to_string()),
            Value::NodeSet(_)
            | Value::EdgeSet(_)
            | Value::PropertyMap(_)
            | Value::Function(_)
            | Value::Closure(_) => Err(ExecutionError::NotAString(self.type_name())),
        }
    }

    /// Combines this collection with another one of the same kind.  Node and edge sets are
    /// unioned, string sets and lists are concatenated.  Adding `Null` to a node or edge set
    /// leaves it unchanged.
    pub fn add(&self, other: &Value) -> Result<Value, ExecutionError> {
        let incompatible = || ExecutionError::IncompatibleValue(self.type_name(), other.type_name());
        match self {
            Value::StringSet(values) => match other {
                Value::StringSet(others) => {
                    Ok(Value::StringSet(values.iter().chain(others).cloned().collect()))
                }
                _ => Err(incompatible()),
            },
            Value::List(values) => match other {
                Value::List(others) => Ok(Value::List(values.iter().chain(others).cloned().collect())),
                _ => Err(incompatible()),
            },
            Value::NodeSet(nodes) => match other {
                Value::Null => Ok(self.clone()),
                Value::NodeSet(others) => Ok(Value::NodeSet(nodes.union(others))),
                _ => Err(incompatible()),
            },
            Value::EdgeSet(edges) => match other {
                Value::Null => Ok(self.clone()),
                Value::EdgeSet(others) => Ok(Value::EdgeSet(edges.union(others))),
                _ => Err(incompatible()),
            },
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::PropertyMap(_)
            | Value::Function(_)
            | Value::Closure(_)
            | Value::LValue(_) => Err(ExecutionError::CannotAccumulate),
        }
    }

    /// Applies `f` to every element of this collection, and combines the results using
    /// [`add`][Value::add].  Node and edge sets are iterated as singleton sets.  A string is
    /// treated as a collection containing only itself.  An empty collection yields `Null`.
    pub fn iterate<F>(&self, mut f: F) -> Result<Value, ExecutionError>
    where
        F: FnMut(Value) -> Result<Value, ExecutionError>,
    {
        let elements: Vec<Value> = match self {
            Value::String(_) => return f(self.clone()),
            Value::StringSet(values) => values.iter().cloned().map(Value::String).collect(),
            Value::List(values) => values.clone(),
            Value::NodeSet(nodes) => nodes
                .iter()
                .map(|node| Value::NodeSet(node.clone().into()))
                .collect(),
            Value::EdgeSet(edges) => edges
                .iter()
                .map(|edge| Value::EdgeSet(edge.clone().into()))
                .collect(),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::PropertyMap(_)
            | Value::Function(_)
            | Value::Closure(_)
            | Value::LValue(_) => return Err(ExecutionError::CannotIterate(self.type_name())),
        };
        let mut result: Option<Value> = None;
        for element in elements {
            let value = f(element)?;
            result = Some(match result {
                None => value,
                Some(accumulated) => accumulated
                    .add(&value)
                    .map_err(|_| ExecutionError::CannotAccumulate)?,
            });
        }
        Ok(result.unwrap_or(Value::Null))
    }

    /// Renders this value as JSON.  Nodes are written as their identifiers, and edges as objects
    /// with `label`, `from`, and `to` fields.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the nodes of this value, if it is a node set.
    pub fn as_node_set(&self) -> Option<&NodeSet> {
        match self {
            Value::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }

    /// Returns the edges of this value, if it is an edge set.
    pub fn as_edge_set(&self) -> Option<&EdgeSet> {
        match self {
            Value::EdgeSet(edges) => Some(edges),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::StringSet(a), Value::StringSet(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::NodeSet(a), Value::NodeSet(b)) => a == b,
            (Value::EdgeSet(a), Value::EdgeSet(b)) => a == b,
            (Value::PropertyMap(a), Value::PropertyMap(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Closure(a), Value::Closure(b)) => a.ptr_eq(b),
            (Value::LValue(a), Value::LValue(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Bool(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Value {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Value {
        Value::StringSet(value)
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Value {
        Value::StringSet(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Value {
        Value::List(value)
    }
}

impl From<Node> for Value {
    fn from(value: Node) -> Value {
        Value::NodeSet(value.into())
    }
}

impl From<Vec<Node>> for Value {
    fn from(value: Vec<Node>) -> Value {
        Value::NodeSet(value.into_iter().collect())
    }
}

impl From<NodeSet> for Value {
    fn from(value: NodeSet) -> Value {
        Value::NodeSet(value)
    }
}

impl From<Edge> for Value {
    fn from(value: Edge) -> Value {
        Value::EdgeSet(value.into())
    }
}

impl From<Vec<Edge>> for Value {
    fn from(value: Vec<Edge>) -> Value {
        Value::EdgeSet(value.into_iter().collect())
    }
}

impl From<EdgeSet> for Value {
    fn from(value: EdgeSet) -> Value {
        Value::EdgeSet(value)
    }
}

impl From<Properties> for Value {
    fn from(value: Properties) -> Value {
        Value::PropertyMap(value.into())
    }
}

impl From<PropertyMap> for Value {
    fn from(value: PropertyMap) -> Value {
        Value::PropertyMap(value)
    }
}

impl From<&PropertyValue> for Value {
    fn from(value: &PropertyValue) -> Value {
        match value {
            PropertyValue::String(value) => Value::String(value.clone()),
            PropertyValue::StringSet(values) => Value::StringSet(values.clone()),
        }
    }
}

impl From<NativeFunction> for Value {
    fn from(value: NativeFunction) -> Value {
        Value::Function(value)
    }
}

impl From<Closure> for Value {
    fn from(value: Closure) -> Value {
        Value::Closure(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Value {
        match value {
            Some(value) => value.into(),
            None => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_list<T: fmt::Display>(
            f: &mut fmt::Formatter,
            elements: impl IntoIterator<Item = T>,
        ) -> fmt::Result {
            write!(f, "[")?;
            let mut first = true;
            for element in elements {
                if first {
                    first = false;
                    write!(f, "{}", element)?;
                } else {
                    write!(f, ", {}", element)?;
                }
            }
            write!(f, "]")
        }

        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Number(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{:?}", value),
            Value::StringSet(values) => write_list(f, values.iter().map(|v| format!("{:?}", v))),
            Value::List(values) => write_list(f, values),
            Value::NodeSet(nodes) => write_list(f, nodes),
            Value::EdgeSet(edges) => write_list(f, edges),
            Value::PropertyMap(map) => {
                write!(f, "{{")?;
                let mut first = true;
                for (key, value) in map.properties().iter() {
                    if first {
                        first = false;
                    } else {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => write!(f, "<function {}>", function.name()),
            Value::Closure(closure) => write!(f, "<closure {}>", closure),
            Value::LValue(name) => write!(f, "<lvalue {}>", name),
        }
    }
}

impl ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(value) => serializer.serialize_bool(*value),
            Value::Number(value) => {
                if let Ok(integer) = value.as_str().parse::<i64>() {
                    serializer.serialize_i64(integer)
                } else if let Ok(float) = value.as_str().parse::<f64>() {
                    serializer.serialize_f64(float)
                } else {
                    serializer.serialize_str(value.as_str())
                }
            }
            Value::String(value) => serializer.serialize_str(value),
            Value::StringSet(values) => serializer.collect_seq(values),
            Value::List(values) => serializer.collect_seq(values),
            Value::NodeSet(nodes) => nodes.serialize(serializer),
            Value::EdgeSet(edges) => edges.serialize(serializer),
            Value::PropertyMap(map) => {
                let properties = map.properties();
                let mut ser = serializer.serialize_map(Some(properties.len()))?;
                for (key, value) in properties.iter() {
                    ser.serialize_entry(key, value)?;
                }
                ser.end()
            }
            Value::Function(_) | Value::Closure(_) => serializer.serialize_str(&self.to_string()),
            Value::LValue(name) => name.serialize(serializer),
        }
    }
}
