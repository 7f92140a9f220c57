// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

use crate::execution::CancellationError;
use crate::variables::VariableError;

/// An error that can occur while evaluating a script
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Cancelled(#[from] CancellationError),
    #[error("Cannot accumulate collection of values")]
    CannotAccumulate,
    #[error("Cannot iterate over {0}")]
    CannotIterate(&'static str),
    #[error("Incomparable values: {0} and {1}")]
    Incomparable(&'static str, &'static str),
    #[error("Incompatible value: cannot add {1} to {0}")]
    IncompatibleValue(&'static str, &'static str),
    #[error("Invalid argument to '{method}': {message}")]
    InvalidArguments { method: String, message: String },
    #[error("Invalid function call: {0}")]
    InvalidFunctionCall(String),
    #[error("Multiple edges in result")]
    MultipleEdgesInResult,
    #[error("Multiple nodes in result")]
    MultipleNodesInResult,
    #[error("No edges in result")]
    NoEdgesInResult,
    #[error("No nodes in result")]
    NoNodesInResult,
    #[error("Not a number: {0}")]
    NotANumber(String),
    #[error("Not a string: {0}")]
    NotAString(&'static str),
    #[error("Not callable: {0}")]
    NotCallable(&'static str),
    #[error("Not indexable: {0}")]
    NotIndexable(&'static str),
    #[error("Not an lvalue: {0}")]
    NotLValue(&'static str),
    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("Unknown selector '{selector}' on {value}")]
    UnknownSelector {
        selector: String,
        value: &'static str,
    },
}

impl From<VariableError> for ExecutionError {
    fn from(error: VariableError) -> ExecutionError {
        match error {
            VariableError::UndefinedVariable(name) => ExecutionError::UnknownIdentifier(name),
        }
    }
}
