// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Defines the AST structure of a script

use std::fmt;
use std::rc::Rc;

use crate::Identifier;
use crate::Location;

/// A parsed script
#[derive(Debug, Eq, PartialEq)]
pub struct Script {
    /// A single expression, or the list of statements that make up the script
    pub body: Expression,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.body.fmt(f)
    }
}

/// An expression or statement that can appear in a script
#[derive(Debug, Eq, PartialEq)]
pub enum Expression {
    // Literals
    FalseLiteral,
    NullLiteral,
    TrueLiteral,
    // Constants
    NumberConstant(NumberConstant),
    StringConstant(StringConstant),
    // Variables
    Variable(Variable),
    LValue(LValue),
    Assign(Assign),
    // Access
    Select(Select),
    Index(IndexExpression),
    // Operators
    And(LogicalAnd),
    Or(LogicalOr),
    Not(Not),
    Equality(Equality),
    // Functions
    Call(Call),
    Closure(ClosureLiteral),
    // Statements
    StatementList(StatementList),
    StatementBlock(StatementBlock),
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::FalseLiteral => write!(f, "false"),
            Expression::NullLiteral => write!(f, "null"),
            Expression::TrueLiteral => write!(f, "true"),
            Expression::NumberConstant(expr) => expr.fmt(f),
            Expression::StringConstant(expr) => expr.fmt(f),
            Expression::Variable(expr) => expr.fmt(f),
            Expression::LValue(expr) => expr.fmt(f),
            Expression::Assign(expr) => expr.fmt(f),
            Expression::Select(expr) => expr.fmt(f),
            Expression::Index(expr) => expr.fmt(f),
            Expression::And(expr) => expr.fmt(f),
            Expression::Or(expr) => expr.fmt(f),
            Expression::Not(expr) => expr.fmt(f),
            Expression::Equality(expr) => expr.fmt(f),
            Expression::Call(expr) => expr.fmt(f),
            Expression::Closure(expr) => expr.fmt(f),
            Expression::StatementList(expr) => expr.fmt(f),
            Expression::StatementBlock(expr) => expr.fmt(f),
        }
    }
}

/// A numeric constant, kept in the exact form it was written in
#[derive(Debug, Eq, PartialEq)]
pub struct NumberConstant {
    pub value: String,
}

impl From<NumberConstant> for Expression {
    fn from(expr: NumberConstant) -> Expression {
        Expression::NumberConstant(expr)
    }
}

impl fmt::Display for NumberConstant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A string constant
#[derive(Debug, Eq, PartialEq)]
pub struct StringConstant {
    pub value: String,
}

impl From<StringConstant> for Expression {
    fn from(expr: StringConstant) -> Expression {
        Expression::StringConstant(expr)
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Expression {
        Expression::StringConstant(StringConstant { value })
    }
}

impl fmt::Display for StringConstant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

/// A reference to a variable
#[derive(Debug, Eq, PartialEq)]
pub struct Variable {
    pub name: Identifier,
    pub location: Location,
}

impl From<Variable> for Expression {
    fn from(expr: Variable) -> Expression {
        Expression::Variable(expr)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The target of an assignment
#[derive(Debug, Eq, PartialEq)]
pub struct LValue {
    pub name: Identifier,
    pub location: Location,
}

impl From<LValue> for Expression {
    fn from(expr: LValue) -> Expression {
        Expression::LValue(expr)
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An assignment, which declares a variable in the current scope
#[derive(Debug, Eq, PartialEq)]
pub struct Assign {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
    pub location: Location,
}

impl From<Assign> for Expression {
    fn from(expr: Assign) -> Expression {
        Expression::Assign(expr)
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

/// A selector applied to a value: `base.selector`
#[derive(Debug, Eq, PartialEq)]
pub struct Select {
    pub base: Box<Expression>,
    pub selector: Identifier,
    pub location: Location,
}

impl From<Select> for Expression {
    fn from(expr: Select) -> Expression {
        Expression::Select(expr)
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.base, self.selector)
    }
}

/// An index into a value: `base[index]`
#[derive(Debug, Eq, PartialEq)]
pub struct IndexExpression {
    pub base: Box<Expression>,
    pub index: Box<Expression>,
    pub location: Location,
}

impl From<IndexExpression> for Expression {
    fn from(expr: IndexExpression) -> Expression {
        Expression::Index(expr)
    }
}

impl fmt::Display for IndexExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.base, self.index)
    }
}

/// A short-circuiting `&&`
#[derive(Debug, Eq, PartialEq)]
pub struct LogicalAnd {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl From<LogicalAnd> for Expression {
    fn from(expr: LogicalAnd) -> Expression {
        Expression::And(expr)
    }
}

impl fmt::Display for LogicalAnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} && {})", self.left, self.right)
    }
}

/// A short-circuiting `||`
#[derive(Debug, Eq, PartialEq)]
pub struct LogicalOr {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

impl From<LogicalOr> for Expression {
    fn from(expr: LogicalOr) -> Expression {
        Expression::Or(expr)
    }
}

impl fmt::Display for LogicalOr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} || {})", self.left, self.right)
    }
}

/// A boolean negation
#[derive(Debug, Eq, PartialEq)]
pub struct Not {
    pub value: Box<Expression>,
}

impl From<Not> for Expression {
    fn from(expr: Not) -> Expression {
        Expression::Not(expr)
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "!{}", self.value)
    }
}

/// An `==` or `!=` comparison
#[derive(Debug, Eq, PartialEq)]
pub struct Equality {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    /// Whether this is a `!=`
    pub negated: bool,
}

impl From<Equality> for Expression {
    fn from(expr: Equality) -> Expression {
        Expression::Equality(expr)
    }
}

impl fmt::Display for Equality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let operator = if self.negated { "!=" } else { "==" };
        write!(f, "({} {} {})", self.left, operator, self.right)
    }
}

/// A function call
#[derive(Debug, Eq, PartialEq)]
pub struct Call {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: Location,
}

impl From<Call> for Expression {
    fn from(expr: Call) -> Expression {
        Expression::Call(expr)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        let mut first = true;
        for arg in &self.arguments {
            if first {
                first = false;
                write!(f, "{}", arg)?;
            } else {
                write!(f, ", {}", arg)?;
            }
        }
        write!(f, ")")
    }
}

/// A closure: `name -> body`, or a bare block `{ ... }` with no parameter.  The body is shared
/// with every closure value that is created from it.
#[derive(Debug, Eq, PartialEq)]
pub struct ClosureLiteral {
    pub parameter: Option<Identifier>,
    pub body: Rc<Expression>,
}

impl From<ClosureLiteral> for Expression {
    fn from(expr: ClosureLiteral) -> Expression {
        Expression::Closure(expr)
    }
}

impl fmt::Display for ClosureLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.parameter {
            Some(parameter) => write!(f, "{} -> {}", parameter, self.body),
            None => write!(f, "{}", self.body),
        }
    }
}

/// A sequence of statements evaluated in the current scope
#[derive(Debug, Eq, PartialEq)]
pub struct StatementList {
    pub statements: Vec<Expression>,
}

impl From<StatementList> for Expression {
    fn from(expr: StatementList) -> Expression {
        Expression::StatementList(expr)
    }
}

impl fmt::Display for StatementList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}; ", statement)?;
        }
        Ok(())
    }
}

/// A sequence of statements evaluated in a new nested scope
#[derive(Debug, Eq, PartialEq)]
pub struct StatementBlock {
    pub statements: Vec<Expression>,
}

impl From<StatementBlock> for Expression {
    fn from(expr: StatementBlock) -> Expression {
        Expression::StatementBlock(expr)
    }
}

impl fmt::Display for StatementBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{ ")?;
        for statement in &self.statements {
            write!(f, "{}; ", statement)?;
        }
        write!(f, "}}")
    }
}
