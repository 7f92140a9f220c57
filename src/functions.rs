// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Functions and closures that can be called by scripts

use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::ast;
use crate::execution::error::ExecutionError;
use crate::execution::ExecutionContext;
use crate::parser::Location;
use crate::values::Value;
use crate::variables::Scope;
use crate::Identifier;

/// The implementation of a function that can be called from a script.
///
/// You have access to the execution context of the call site: its scope, the execution
/// configuration, and the cancellation flag.  A function that evaluates closures passed to it as
/// arguments should evaluate them in that same context.
///
/// Any other data that you need must be captured by the function value itself, or passed in as a
/// parameter.  You can use the [`Parameters`][] trait to consume those parameters and verify that
/// you received the correct number and type of them.
pub trait Function {
    fn call(
        &self,
        exec: &ExecutionContext,
        parameters: &mut dyn Parameters,
    ) -> Result<Value, ExecutionError>;
}

/// A helper trait for consuming the parameters of a function.  You will typically use it as
/// follows:
///
/// ```
/// # use graphscript::functions::Parameters;
/// # use graphscript::ExecutionError;
/// # use graphscript::Value;
/// # fn main() -> Result<(), ExecutionError> {
/// # let param_vec = vec![Value::from("test"), Value::from(42)];
/// # let mut params = param_vec.into_iter();
/// let first_param = params.param()?.as_string()?;
/// let second_param = params.param()?.as_int()?;
/// // etc
/// params.finish()?;
/// # Ok(())
/// # }
/// ```
pub trait Parameters {
    /// Returns the next parameter, returning an error if you have exhausted all of the parameters
    /// that were passed in.
    fn param(&mut self) -> Result<Value, ExecutionError>;

    /// Ensures that there are no more parameters to consume.
    fn finish(&mut self) -> Result<(), ExecutionError>;
}

impl<I> Parameters for I
where
    I: Iterator<Item = Value>,
{
    fn param(&mut self) -> Result<Value, ExecutionError> {
        self.next().ok_or_else(|| {
            ExecutionError::InvalidFunctionCall("expected more parameters".to_string())
        })
    }

    fn finish(&mut self) -> Result<(), ExecutionError> {
        if self.next().is_some() {
            return Err(ExecutionError::InvalidFunctionCall(
                "unexpected extra parameter".to_string(),
            ));
        }
        Ok(())
    }
}

/// A named native function, as returned by the callable selectors of a value.  The number of
/// arguments is checked before the implementation is invoked.
#[derive(Clone)]
pub struct NativeFunction {
    name: Identifier,
    min_args: usize,
    max_args: Option<usize>,
    function: Rc<dyn Function>,
}

impl NativeFunction {
    /// Creates a new function.  A `max_args` of `None` accepts any number of arguments.
    pub fn new<F>(name: &str, min_args: usize, max_args: Option<usize>, function: F) -> Self
    where
        F: Function + 'static,
    {
        NativeFunction {
            name: Identifier::from(name),
            min_args,
            max_args,
            function: Rc::new(function),
        }
    }

    /// Creates a new function from a Rust closure that receives the arguments as a vector.
    pub fn from_fn<F>(name: &str, min_args: usize, max_args: Option<usize>, function: F) -> Self
    where
        F: Fn(&ExecutionContext, Vec<Value>) -> Result<Value, ExecutionError> + 'static,
    {
        Self::new(name, min_args, max_args, FnFunction(function))
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> Option<usize> {
        self.max_args
    }

    /// Returns whether two handles refer to the same function implementation.
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Rc::ptr_eq(&self.function, &other.function)
    }

    pub fn call(&self, exec: &ExecutionContext, args: Vec<Value>) -> Result<Value, ExecutionError> {
        if args.len() < self.min_args {
            return Err(ExecutionError::InvalidFunctionCall(format!(
                "'{}' needs at least {} args but got {}",
                self.name,
                self.min_args,
                args.len()
            )));
        }
        if let Some(max_args) = self.max_args {
            if args.len() > max_args {
                return Err(ExecutionError::InvalidFunctionCall(format!(
                    "'{}' needs at most {} args but got {}",
                    self.name,
                    max_args,
                    args.len()
                )));
            }
        }
        trace!("call {} with {} args", self.name, args.len());
        self.function.call(exec, &mut args.into_iter())
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish()
    }
}

struct FnFunction<F>(F);

impl<F> Function for FnFunction<F>
where
    F: Fn(&ExecutionContext, Vec<Value>) -> Result<Value, ExecutionError>,
{
    fn call(
        &self,
        exec: &ExecutionContext,
        parameters: &mut dyn Parameters,
    ) -> Result<Value, ExecutionError> {
        let mut args = Vec::new();
        while let Ok(arg) = parameters.param() {
            args.push(arg);
        }
        (self.0)(exec, args)
    }
}

/// A closure value: a script expression with an optional parameter, together with the scope it
/// was created in.
///
/// Each invocation evaluates the body in a fresh scope nested inside the captured one, so
/// variables assigned by the body never leak out of it.  Closures that are synthesized by native
/// functions capture no scope, and are evaluated in a scope nested inside the caller's.
#[derive(Clone)]
pub struct Closure {
    parameter: Option<Identifier>,
    body: Rc<ast::Expression>,
    scope: Option<Scope>,
}

impl Closure {
    pub(crate) fn new(
        parameter: Option<Identifier>,
        body: Rc<ast::Expression>,
        scope: Option<Scope>,
    ) -> Closure {
        Closure {
            parameter,
            body,
            scope,
        }
    }

    /// Creates a closure that compares `selector` of its argument with a string, as in
    /// `n -> n.id == "value"`.
    pub(crate) fn matching(selector: &str, value: &str) -> Closure {
        let parameter = Identifier::from("n");
        let body = ast::Equality {
            left: Box::new(
                ast::Select {
                    base: Box::new(
                        ast::Variable {
                            name: parameter.clone(),
                            location: Location::default(),
                        }
                        .into(),
                    ),
                    selector: Identifier::from(selector),
                    location: Location::default(),
                }
                .into(),
            ),
            right: Box::new(value.to_string().into()),
            negated: false,
        };
        Closure::new(Some(parameter), Rc::new(body.into()), None)
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_ref().map(Identifier::as_str)
    }

    /// Evaluates the body of this closure with its parameter, if any, bound to `argument`.
    pub fn evaluate(
        &self,
        argument: Value,
        exec: &ExecutionContext,
    ) -> Result<Value, ExecutionError> {
        let scope = self.scope.as_ref().unwrap_or(&exec.scope).nested();
        if let Some(parameter) = &self.parameter {
            scope.declare(parameter.clone(), argument);
        }
        trace!("closure {} {{", self);
        let result = self.body.evaluate(&exec.with_scope(scope))?;
        trace!("}} = {}", result);
        Ok(result)
    }

    pub fn call(&self, exec: &ExecutionContext, args: Vec<Value>) -> Result<Value, ExecutionError> {
        if args.len() > 1 {
            return Err(ExecutionError::InvalidFunctionCall(format!(
                "closures take at most 1 argument but got {}",
                args.len()
            )));
        }
        let argument = args.into_iter().next().unwrap_or(Value::Null);
        self.evaluate(argument, exec)
    }

    /// Returns whether two handles refer to the same closure.
    pub fn ptr_eq(&self, other: &Closure) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
            && match (&self.scope, &other.scope) {
                (Some(a), Some(b)) => a.ptr_eq(b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(f, "{} -> {}", parameter, self.body),
            None => write!(f, "{}", self.body),
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Closure({})", self)
    }
}

/// A test applied to each node or edge that a traversal visits.
pub(crate) enum Predicate {
    Closure(Closure),
    Constant(bool),
}

impl Predicate {
    /// Interprets an argument as a node predicate.  Strings match node ids.
    pub(crate) fn for_nodes(method: &str, value: Value) -> Result<Predicate, ExecutionError> {
        Self::from_value(method, value, "id")
    }

    /// Interprets an argument as an edge predicate.  Strings match edge labels.
    pub(crate) fn for_edges(method: &str, value: Value) -> Result<Predicate, ExecutionError> {
        Self::from_value(method, value, "label")
    }

    fn from_value(
        method: &str,
        value: Value,
        selector: &str,
    ) -> Result<Predicate, ExecutionError> {
        match value {
            Value::Closure(closure) => Ok(Predicate::Closure(closure)),
            Value::String(string) => Ok(Predicate::Closure(Closure::matching(selector, &string))),
            Value::Bool(constant) => Ok(Predicate::Constant(constant)),
            other => Err(ExecutionError::InvalidArguments {
                method: method.to_string(),
                message: format!(
                    "expected a closure, string, or bool predicate, got {}",
                    other.type_name()
                ),
            }),
        }
    }

    pub(crate) fn test(&self, exec: &ExecutionContext, value: Value) -> Result<bool, ExecutionError> {
        exec.cancellation_flag.check("predicate")?;
        match self {
            Predicate::Closure(closure) => closure.evaluate(value, exec)?.as_bool(),
            Predicate::Constant(constant) => Ok(*constant),
        }
    }
}

pub mod stdlib {
    /// Functions that traverse the graph from a set of nodes
    pub mod graph {
        use log::trace;

        use crate::execution::error::ExecutionError;
        use crate::execution::ExecutionContext;
        use crate::functions::Function;
        use crate::functions::Parameters;
        use crate::functions::Predicate;
        use crate::graph::Edge;
        use crate::graph::Node;
        use crate::graph::NodeSet;
        use crate::graph::Walk as GraphWalk;
        use crate::values::Value;

        /// The `firstReachable` selector of a node set
        pub struct FirstReachable {
            pub nodes: NodeSet,
        }

        impl Function for FirstReachable {
            fn call(
                &self,
                exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let node_predicate = Predicate::for_nodes("firstReachable", parameters.param()?)?;
                let edge_predicate = match parameters.param() {
                    Ok(value) => Predicate::for_edges("firstReachable", value)?,
                    Err(_) => Predicate::Constant(true),
                };
                for start in &self.nodes {
                    trace!("firstReachable from {}", start);
                    let found = start.first_reachable(
                        |node: &Node| node_predicate.test(exec, node.clone().into()),
                        |edge: &Edge| edge_predicate.test(exec, edge.clone().into()),
                    )?;
                    if let Some(node) = found {
                        return Ok(NodeSet::from(node).into());
                    }
                }
                Ok(NodeSet::new().into())
            }
        }

        /// The `firstDoc` selector of a node set
        pub struct FirstDoc {
            pub nodes: NodeSet,
        }

        impl Function for FirstDoc {
            fn call(
                &self,
                exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let predicate = Predicate::for_nodes("firstDoc", parameters.param()?)?;
                parameters.finish()?;
                let document_type = exec.config.document_node_type.as_str();
                let instance_of = exec.config.instance_of_label.as_str();
                for start in &self.nodes {
                    let found = start.first_reachable(
                        |node: &Node| {
                            if !node.has_type(document_type) {
                                return Ok(false);
                            }
                            predicate.test(exec, node.clone().into())
                        },
                        |edge: &Edge| Ok(edge.label() != instance_of),
                    )?;
                    if let Some(node) = found {
                        return Ok(NodeSet::from(node).into());
                    }
                }
                Ok(NodeSet::new().into())
            }
        }

        /// The `instanceOf` selector of a node set
        pub struct InstanceOf {
            pub nodes: NodeSet,
        }

        impl Function for InstanceOf {
            fn call(
                &self,
                exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let id = parameters.param()?.as_string()?;
                parameters.finish()?;
                let label = exec.config.instance_of_label.as_str();
                let mut result = NodeSet::new();
                for node in &self.nodes {
                    exec.cancellation_flag.check("instanceOf")?;
                    if node.instance_of(label).iter().any(|class| class.id() == id) {
                        result.insert(node.clone());
                    }
                }
                Ok(result.into())
            }
        }

        /// The `walk` selector of a node set
        pub struct Walk {
            pub nodes: NodeSet,
        }

        impl Function for Walk {
            fn call(
                &self,
                exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let mut arguments = Vec::new();
                while let Ok(argument) = parameters.param() {
                    arguments.push(argument);
                }
                let mut walk = GraphWalk::new();
                let mut arguments = arguments.into_iter();
                while let Some(edge_argument) = arguments.next() {
                    let edge_predicate = Predicate::for_edges("walk", edge_argument)?;
                    let node_predicate = match arguments.next() {
                        Some(node_argument) => Predicate::for_nodes("walk", node_argument)?,
                        None => Predicate::Constant(true),
                    };
                    walk = walk.step(
                        move |edge: &Edge| edge_predicate.test(exec, edge.clone().into()),
                        move |node: &Node| node_predicate.test(exec, node.clone().into()),
                    );
                }
                trace!("walk {} steps from {} nodes", walk.len(), self.nodes.len());
                Ok(walk.run(&self.nodes)?.into())
            }
        }
    }

    /// Functions that test strings and string sets
    pub mod string {
        use regex::Regex;

        use crate::execution::error::ExecutionError;
        use crate::execution::ExecutionContext;
        use crate::functions::Function;
        use crate::functions::Parameters;
        use crate::values::Value;

        /// Flattens a string or string set argument into its strings.
        fn strings(value: Value) -> Result<Vec<String>, ExecutionError> {
            match value {
                Value::StringSet(values) => Ok(values),
                other => Ok(vec![other.as_string()?]),
            }
        }

        /// The `matches` selector of a string
        pub struct Matches {
            pub value: String,
        }

        impl Function for Matches {
            fn call(
                &self,
                _exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let pattern = parameters.param()?.as_string()?;
                parameters.finish()?;
                let regex = Regex::new(&pattern).map_err(|e| ExecutionError::InvalidArguments {
                    method: "matches".to_string(),
                    message: e.to_string(),
                })?;
                Ok(regex.is_match(&self.value).into())
            }
        }

        /// The `has` selector of a string set
        pub struct Has {
            pub values: Vec<String>,
        }

        impl Function for Has {
            fn call(
                &self,
                _exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let value = parameters.param()?.as_string()?;
                parameters.finish()?;
                Ok(self.values.contains(&value).into())
            }
        }

        /// The `hasAny` selector of a string set
        pub struct HasAny {
            pub values: Vec<String>,
        }

        impl Function for HasAny {
            fn call(
                &self,
                _exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let mut result = false;
                while let Ok(param) = parameters.param() {
                    if strings(param)?.iter().any(|s| self.values.contains(s)) {
                        result = true;
                    }
                }
                Ok(result.into())
            }
        }

        /// The `hasAll` selector of a string set
        pub struct HasAll {
            pub values: Vec<String>,
        }

        impl Function for HasAll {
            fn call(
                &self,
                _exec: &ExecutionContext,
                parameters: &mut dyn Parameters,
            ) -> Result<Value, ExecutionError> {
                let mut result = true;
                while let Ok(param) = parameters.param() {
                    if !strings(param)?.iter().all(|s| self.values.contains(s)) {
                        result = false;
                    }
                }
                Ok(result.into())
            }
        }
    }
}
