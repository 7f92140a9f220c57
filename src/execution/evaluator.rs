// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use log::trace;

use crate::ast::Assign;
use crate::ast::Call;
use crate::ast::ClosureLiteral;
use crate::ast::Equality;
use crate::ast::Expression;
use crate::ast::IndexExpression;
use crate::ast::LValue;
use crate::ast::LogicalAnd;
use crate::ast::LogicalOr;
use crate::ast::Not;
use crate::ast::NumberConstant;
use crate::ast::Select;
use crate::ast::StatementBlock;
use crate::ast::StatementList;
use crate::ast::StringConstant;
use crate::ast::Variable;
use crate::execution::error::ExecutionError;
use crate::execution::ExecutionContext;
use crate::functions::Closure;
use crate::values::Number;
use crate::values::Value;

impl Expression {
    pub(crate) fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        trace!("eval {} {{", self);
        let result = match self {
            Expression::FalseLiteral => Ok(Value::Bool(false)),
            Expression::NullLiteral => Ok(Value::Null),
            Expression::TrueLiteral => Ok(Value::Bool(true)),
            Expression::NumberConstant(expr) => expr.evaluate(exec),
            Expression::StringConstant(expr) => expr.evaluate(exec),
            Expression::Variable(expr) => expr.evaluate(exec),
            Expression::LValue(expr) => expr.evaluate(exec),
            Expression::Assign(expr) => expr.evaluate(exec),
            Expression::Select(expr) => expr.evaluate(exec),
            Expression::Index(expr) => expr.evaluate(exec),
            Expression::And(expr) => expr.evaluate(exec),
            Expression::Or(expr) => expr.evaluate(exec),
            Expression::Not(expr) => expr.evaluate(exec),
            Expression::Equality(expr) => expr.evaluate(exec),
            Expression::Call(expr) => expr.evaluate(exec),
            Expression::Closure(expr) => expr.evaluate(exec),
            Expression::StatementList(expr) => expr.evaluate(exec),
            Expression::StatementBlock(expr) => expr.evaluate(exec),
        }?;
        trace!("}} = {}", result);
        Ok(result)
    }
}

impl NumberConstant {
    fn evaluate(&self, _exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        Ok(Value::Number(Number::from_literal(&self.value)))
    }
}

impl StringConstant {
    fn evaluate(&self, _exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        Ok(Value::String(self.value.clone()))
    }
}

impl Variable {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        exec.scope
            .get(&self.name)
            .ok_or_else(|| ExecutionError::UnknownIdentifier(self.name.to_string()))
    }
}

impl LValue {
    fn evaluate(&self, _exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        Ok(Value::LValue(self.name.clone()))
    }
}

impl Assign {
    /// Binds the target name in the current scope, shadowing any outer binding.
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        let name = match self.target.evaluate(exec)? {
            Value::LValue(name) => name,
            other => return Err(ExecutionError::NotLValue(other.type_name())),
        };
        let value = self.value.evaluate(exec)?;
        exec.scope.declare(name, value.clone());
        Ok(value)
    }
}

impl Select {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        self.base.evaluate(exec)?.selector(&self.selector)
    }
}

impl IndexExpression {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        let base = self.base.evaluate(exec)?;
        let index = self.index.evaluate(exec)?;
        base.index(&index)
    }
}

impl LogicalAnd {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        if !self.left.evaluate(exec)?.as_bool()? {
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(self.right.evaluate(exec)?.as_bool()?))
    }
}

impl LogicalOr {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        if self.left.evaluate(exec)?.as_bool()? {
            return Ok(Value::Bool(true));
        }
        Ok(Value::Bool(self.right.evaluate(exec)?.as_bool()?))
    }
}

impl Not {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        Ok(Value::Bool(!self.value.evaluate(exec)?.as_bool()?))
    }
}

impl Equality {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        let left = self.left.evaluate(exec)?;
        let right = self.right.evaluate(exec)?;
        Ok(Value::Bool(left.equals(&right)? != self.negated))
    }
}

impl Call {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        let function = self.function.evaluate(exec)?;
        let arguments = self
            .arguments
            .iter()
            .map(|argument| argument.evaluate(exec))
            .collect::<Result<Vec<_>, _>>()?;
        function.call(exec, arguments)
    }
}

impl ClosureLiteral {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        Ok(Closure::new(
            self.parameter.clone(),
            self.body.clone(),
            Some(exec.scope.capture()),
        )
        .into())
    }
}

impl StatementList {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        evaluate_statements(&self.statements, exec)
    }
}

impl StatementBlock {
    fn evaluate(&self, exec: &ExecutionContext) -> Result<Value, ExecutionError> {
        evaluate_statements(&self.statements, &exec.with_scope(exec.scope.nested()))
    }
}

/// Evaluates each statement in turn, returning the value of the last one, or `Null` if there are
/// none.
fn evaluate_statements(
    statements: &[Expression],
    exec: &ExecutionContext,
) -> Result<Value, ExecutionError> {
    let mut result = Value::Null;
    for statement in statements {
        exec.cancellation_flag.check("statement")?;
        result = statement.evaluate(exec)?;
    }
    Ok(result)
}
