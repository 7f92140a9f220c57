// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use log::debug;
use thiserror::Error;

use crate::ast::Script;
use crate::execution::error::ExecutionError;
use crate::values::Value;
use crate::variables::Scope;

pub(crate) mod error;
mod evaluator;

/// The default label of the edges that link a node to the nodes it is an instance of
pub const DEFAULT_INSTANCE_OF_LABEL: &str = "https://lschema.org/data/instanceOf";

/// The default type of the nodes that `firstDoc` looks for
pub const DEFAULT_DOCUMENT_NODE_TYPE: &str = "https://lschema.org/DocumentNode";

impl Script {
    /// Evaluates this script in the given scope, using the default configuration.  Variables that
    /// the script assigns at its top level are defined in `scope`.
    pub fn evaluate(&self, scope: &Scope) -> Result<Value, ExecutionError> {
        self.execute(scope, &ExecutionConfig::default(), &NoCancellation)
    }

    /// Evaluates this script in the given scope.  The cancellation flag is checked before each
    /// statement, and for each graph element that a traversal visits.
    pub fn execute(
        &self,
        scope: &Scope,
        config: &ExecutionConfig,
        cancellation_flag: &dyn CancellationFlag,
    ) -> Result<Value, ExecutionError> {
        let exec = ExecutionContext {
            scope: scope.capture(),
            config,
            cancellation_flag,
        };
        debug!("evaluate {}", self);
        let result = self.body.evaluate(&exec)?;
        debug!("result {}", result);
        Ok(result)
    }
}

/// Configuration for the evaluation of a script
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    pub(crate) instance_of_label: String,
    pub(crate) document_node_type: String,
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self {
            instance_of_label: DEFAULT_INSTANCE_OF_LABEL.to_string(),
            document_node_type: DEFAULT_DOCUMENT_NODE_TYPE.to_string(),
        }
    }

    /// Sets the edge label that `instanceOf` and `firstDoc` treat as the instance-of relation.
    pub fn instance_of_label<S: Into<String>>(self, instance_of_label: S) -> Self {
        Self {
            instance_of_label: instance_of_label.into(),
            document_node_type: self.document_node_type,
        }
    }

    /// Sets the node type that `firstDoc` looks for.
    pub fn document_node_type<S: Into<String>>(self, document_node_type: S) -> Self {
        Self {
            instance_of_label: self.instance_of_label,
            document_node_type: document_node_type.into(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that an expression, closure, or native function needs while it is being evaluated
pub struct ExecutionContext<'a> {
    pub(crate) scope: Scope,
    pub(crate) config: &'a ExecutionConfig,
    pub(crate) cancellation_flag: &'a dyn CancellationFlag,
}

impl<'a> ExecutionContext<'a> {
    /// The scope that variables are looked up in and assigned to
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn cancellation_flag(&self) -> &dyn CancellationFlag {
        self.cancellation_flag
    }

    /// Returns a context that is identical to this one, except that it evaluates in `scope`.
    pub fn with_scope(&self, scope: Scope) -> ExecutionContext<'a> {
        ExecutionContext {
            scope,
            config: self.config,
            cancellation_flag: self.cancellation_flag,
        }
    }
}

/// Trait to signal that the execution is cancelled
pub trait CancellationFlag {
    fn check(&self, at: &'static str) -> Result<(), CancellationError>;
}

pub struct NoCancellation;
impl CancellationFlag for NoCancellation {
    fn check(&self, _at: &'static str) -> Result<(), CancellationError> {
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Cancelled at \"{0}\"")]
pub struct CancellationError(pub &'static str);
