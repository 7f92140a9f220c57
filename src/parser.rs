// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;

use thiserror::Error;

use crate::ast;
use crate::Identifier;

impl ast::Script {
    /// Parses a script.
    pub fn parse(source: &str) -> Result<ast::Script, ParseError> {
        Parser::new(source).parse_script()
    }
}

/// An error that can occur while parsing a script
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Expected '{0}' at {1}")]
    ExpectedToken(&'static str, Location),
    #[error("Invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Location),
    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Location),
    #[error("Unexpected character '{0}' in {1} at {2}")]
    UnexpectedCharacter(char, &'static str, Location),
    #[error("Unexpected end of file at {0}")]
    UnexpectedEOF(Location),
    #[error("Unexpected keyword '{0}' at {1}")]
    UnexpectedKeyword(String, Location),
}

impl ParseError {
    /// Returns the location in the script where this error was found.
    pub fn location(&self) -> Location {
        match self {
            ParseError::ExpectedToken(_, location)
            | ParseError::InvalidEscape(_, location)
            | ParseError::InvalidNumber(_, location)
            | ParseError::UnexpectedCharacter(_, _, location)
            | ParseError::UnexpectedEOF(location)
            | ParseError::UnexpectedKeyword(_, location) => *location,
        }
    }
}

/// The location of an entity within a script
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.row + 1, self.column + 1)
    }
}

const KEYWORDS: &[&str] = &["false", "null", "true"];

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
    offset: usize,
    location: Location,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphabetic()
}

fn is_ident(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphanumeric()
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Parser<'a> {
        let chars = source.chars().peekable();
        Parser {
            source,
            chars,
            offset: 0,
            location: Location::default(),
        }
    }
}

impl Parser<'_> {
    fn peek(&mut self) -> Result<char, ParseError> {
        self.chars
            .peek()
            .copied()
            .ok_or_else(|| ParseError::UnexpectedEOF(self.location))
    }

    fn try_peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Returns the character `n` positions after the next one, without consuming anything.
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.offset..].chars().nth(n)
    }

    fn looking_at(&self, token: &str) -> bool {
        self.source[self.offset..].starts_with(token)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.offset += ch.len_utf8();
        self.location.advance(ch);
        Some(ch)
    }

    fn next(&mut self) -> Result<char, ParseError> {
        self.bump()
            .ok_or_else(|| ParseError::UnexpectedEOF(self.location))
    }

    fn skip(&mut self) -> Result<(), ParseError> {
        self.next().map(|_| ())
    }

    fn consume_whitespace(&mut self) {
        let mut in_comment = false;
        while let Some(ch) = self.try_peek() {
            if in_comment {
                if ch == '\n' {
                    in_comment = false;
                }
            } else if self.looking_at("//") {
                in_comment = true;
            } else if !ch.is_whitespace() {
                return;
            }
            self.bump();
        }
    }

    fn consume_while(&mut self, mut f: impl FnMut(char) -> bool) {
        while let Some(ch) = self.try_peek() {
            if !f(ch) {
                return;
            }
            self.bump();
        }
    }

    fn consume_n(&mut self, count: usize) -> Result<(), ParseError> {
        for _ in 0..count {
            self.next()?;
        }
        Ok(())
    }

    fn consume_token(&mut self, token: &'static str) -> Result<(), ParseError> {
        if self.looking_at(token) {
            self.consume_n(token.chars().count())
        } else {
            Err(ParseError::ExpectedToken(token, self.location))
        }
    }

    fn parse_script(&mut self) -> Result<ast::Script, ParseError> {
        let (mut statements, terminated) = self.parse_statements(None)?;
        let body = if statements.len() == 1 && !terminated {
            statements.remove(0)
        } else {
            ast::StatementList { statements }.into()
        };
        Ok(ast::Script { body })
    }

    /// Parses statements up to `end` (or the end of the script), without consuming `end`.  Also
    /// returns whether any statement was explicitly terminated, which distinguishes a script that
    /// is a single bare expression from a list containing one statement.
    fn parse_statements(
        &mut self,
        end: Option<char>,
    ) -> Result<(Vec<ast::Expression>, bool), ParseError> {
        let mut statements = Vec::new();
        let mut terminated = false;
        loop {
            self.consume_whitespace();
            match self.try_peek() {
                None => match end {
                    Some(_) => return Err(ParseError::ExpectedToken("}", self.location)),
                    None => break,
                },
                Some(ch) if Some(ch) == end => break,
                Some(';') => {
                    self.skip()?;
                    terminated = true;
                }
                Some('{') => {
                    statements.push(self.parse_block()?.into());
                    terminated = true;
                }
                Some(_) => {
                    statements.push(self.parse_expression()?);
                    self.consume_whitespace();
                    match self.try_peek() {
                        Some(';') => {
                            self.skip()?;
                            terminated = true;
                        }
                        Some(ch) if Some(ch) != end => {
                            return Err(ParseError::UnexpectedCharacter(
                                ch,
                                "statement",
                                self.location,
                            ))
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok((statements, terminated))
    }

    fn parse_block(&mut self) -> Result<ast::StatementBlock, ParseError> {
        self.consume_token("{")?;
        let (statements, _) = self.parse_statements(Some('}'))?;
        self.consume_token("}")?;
        Ok(ast::StatementBlock { statements })
    }

    fn parse_identifier(&mut self, within: &'static str) -> Result<Identifier, ParseError> {
        let start = self.offset;
        let location = self.location;
        let ch = self.next()?;
        if !is_ident_start(ch) {
            return Err(ParseError::UnexpectedCharacter(ch, within, location));
        }
        self.consume_while(is_ident);
        let end = self.offset;
        Ok(Identifier::from(&self.source[start..end]))
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = self.next()?;
        let mut value = String::new();
        loop {
            let ch = self.next()?;
            if ch == quote {
                return Ok(value);
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }
            let location = self.location;
            let escaped = self.next()?;
            value.push(match escaped {
                '0' => '\0',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'u' => self.parse_unicode_escape(location)?,
                '\\' | '"' | '\'' | '/' => escaped,
                _ => return Err(ParseError::InvalidEscape(escaped, location)),
            });
        }
    }

    fn parse_unicode_escape(&mut self, location: Location) -> Result<char, ParseError> {
        let mut code = 0;
        for _ in 0..4 {
            let digit = self
                .next()?
                .to_digit(16)
                .ok_or(ParseError::InvalidEscape('u', location))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(ParseError::InvalidEscape('u', location))
    }

    fn parse_number(&mut self) -> Result<ast::Expression, ParseError> {
        let start = self.offset;
        if self.try_peek() == Some('-') {
            self.skip()?;
        }
        self.consume_while(|ch| ch.is_ascii_digit());
        if self.try_peek() == Some('.') && self.peek_ahead(1).map_or(false, |ch| ch.is_ascii_digit())
        {
            self.skip()?;
            self.consume_while(|ch| ch.is_ascii_digit());
        }
        if let Some('e') | Some('E') = self.try_peek() {
            let location = self.location;
            self.skip()?;
            if let Some('+') | Some('-') = self.try_peek() {
                self.skip()?;
            }
            let exponent = self.offset;
            self.consume_while(|ch| ch.is_ascii_digit());
            if exponent == self.offset {
                return Err(ParseError::InvalidNumber(
                    self.source[start..self.offset].to_string(),
                    location,
                ));
            }
        }
        let value = self.source[start..self.offset].to_string();
        Ok(ast::NumberConstant { value }.into())
    }

    /// If the upcoming tokens are a variable name followed by `=` or `:=`, returns the length of
    /// the assignment operator.
    fn assignment_ahead(&self) -> Option<usize> {
        let rest = &self.source[self.offset..];
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, ch)) if is_ident_start(ch) => {}
            _ => return None,
        }
        let end = chars
            .find(|(_, ch)| !is_ident(*ch))
            .map_or(rest.len(), |(index, _)| index);
        let after = rest[end..].trim_start();
        if after.starts_with(":=") {
            Some(2)
        } else if after.starts_with('=') && !after.starts_with("==") {
            Some(1)
        } else {
            None
        }
    }

    fn parse_expression(&mut self) -> Result<ast::Expression, ParseError> {
        match self.assignment_ahead() {
            Some(operator_length) => self.parse_assignment(operator_length),
            None => self.parse_or(),
        }
    }

    fn parse_assignment(&mut self, operator_length: usize) -> Result<ast::Expression, ParseError> {
        let location = self.location;
        let name = self.parse_identifier("assignment")?;
        if KEYWORDS.contains(&name.as_str()) {
            return Err(ParseError::UnexpectedKeyword(name.into_string(), location));
        }
        self.consume_whitespace();
        self.consume_n(operator_length)?;
        self.consume_whitespace();
        let value = self.parse_expression()?;
        Ok(ast::Assign {
            target: Box::new(ast::LValue { name, location }.into()),
            value: Box::new(value),
            location,
        }
        .into())
    }

    fn parse_or(&mut self) -> Result<ast::Expression, ParseError> {
        let mut left = self.parse_and()?;
        loop {
            self.consume_whitespace();
            if !self.looking_at("||") {
                return Ok(left);
            }
            self.consume_token("||")?;
            self.consume_whitespace();
            let right = self.parse_and()?;
            left = ast::LogicalOr {
                left: Box::new(left),
                right: Box::new(right),
            }
            .into();
        }
    }

    fn parse_and(&mut self) -> Result<ast::Expression, ParseError> {
        let mut left = self.parse_equality()?;
        loop {
            self.consume_whitespace();
            if !self.looking_at("&&") {
                return Ok(left);
            }
            self.consume_token("&&")?;
            self.consume_whitespace();
            let right = self.parse_equality()?;
            left = ast::LogicalAnd {
                left: Box::new(left),
                right: Box::new(right),
            }
            .into();
        }
    }

    fn parse_equality(&mut self) -> Result<ast::Expression, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            self.consume_whitespace();
            let negated = if self.looking_at("==") {
                false
            } else if self.looking_at("!=") {
                true
            } else {
                return Ok(left);
            };
            self.consume_n(2)?;
            self.consume_whitespace();
            let right = self.parse_unary()?;
            left = ast::Equality {
                left: Box::new(left),
                right: Box::new(right),
                negated,
            }
            .into();
        }
    }

    fn parse_unary(&mut self) -> Result<ast::Expression, ParseError> {
        if self.peek()? == '!' {
            self.skip()?;
            self.consume_whitespace();
            let value = Box::new(self.parse_unary()?);
            return Ok(ast::Not { value }.into());
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<ast::Expression, ParseError> {
        let mut expression = self.parse_primary()?;
        loop {
            self.consume_whitespace();
            match self.try_peek() {
                Some('.') => {
                    self.skip()?;
                    self.consume_whitespace();
                    let location = self.location;
                    let selector = self.parse_identifier("selector")?;
                    expression = ast::Select {
                        base: Box::new(expression),
                        selector,
                        location,
                    }
                    .into();
                }
                Some('[') => {
                    let location = self.location;
                    self.skip()?;
                    self.consume_whitespace();
                    let index = self.parse_expression()?;
                    self.consume_whitespace();
                    self.consume_token("]")?;
                    expression = ast::IndexExpression {
                        base: Box::new(expression),
                        index: Box::new(index),
                        location,
                    }
                    .into();
                }
                Some('(') => {
                    let location = self.location;
                    self.skip()?;
                    let arguments = self.parse_sequence(')')?;
                    self.consume_token(")")?;
                    expression = ast::Call {
                        function: Box::new(expression),
                        arguments,
                        location,
                    }
                    .into();
                }
                _ => return Ok(expression),
            }
        }
    }

    fn parse_sequence(&mut self, end_marker: char) -> Result<Vec<ast::Expression>, ParseError> {
        let mut elements = Vec::new();
        self.consume_whitespace();
        while self.peek()? != end_marker {
            elements.push(self.parse_expression()?);
            self.consume_whitespace();
            if self.peek()? != end_marker {
                self.consume_token(",")?;
                self.consume_whitespace();
            }
        }
        Ok(elements)
    }

    fn parse_primary(&mut self) -> Result<ast::Expression, ParseError> {
        match self.peek()? {
            '"' | '\'' => Ok(self.parse_string()?.into()),
            '(' => {
                self.skip()?;
                self.consume_whitespace();
                let expression = self.parse_expression()?;
                self.consume_whitespace();
                self.consume_token(")")?;
                Ok(expression)
            }
            '{' => {
                let body = self.parse_block()?;
                Ok(ast::ClosureLiteral {
                    parameter: None,
                    body: Rc::new(body.into()),
                }
                .into())
            }
            ch if ch.is_ascii_digit() => self.parse_number(),
            '-' if self.peek_ahead(1).map_or(false, |ch| ch.is_ascii_digit()) => {
                self.parse_number()
            }
            ch if is_ident_start(ch) => {
                let location = self.location;
                let name = self.parse_identifier("expression")?;
                match name.as_str() {
                    "false" => return Ok(ast::Expression::FalseLiteral),
                    "null" => return Ok(ast::Expression::NullLiteral),
                    "true" => return Ok(ast::Expression::TrueLiteral),
                    _ => {}
                }
                self.consume_whitespace();
                if self.looking_at("->") {
                    self.consume_token("->")?;
                    self.consume_whitespace();
                    let body = if self.peek()? == '{' {
                        self.parse_block()?.into()
                    } else {
                        self.parse_expression()?
                    };
                    return Ok(ast::ClosureLiteral {
                        parameter: Some(name),
                        body: Rc::new(body),
                    }
                    .into());
                }
                Ok(ast::Variable { name, location }.into())
            }
            ch => Err(ParseError::UnexpectedCharacter(
                ch,
                "expression",
                self.location,
            )),
        }
    }
}
