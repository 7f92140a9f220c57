// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

//! Rendering parse errors together with the part of the script that caused them.

#[cfg(feature = "term-colors")]
use colored::Colorize;
use std::ops::Range;
use std::path::Path;

use crate::parser::ParseError;

impl ParseError {
    /// Returns a displayable form of this error that includes the offending line of `source`,
    /// with a caret under the column where the error was found.  `path` is only used to label
    /// the excerpt.
    pub fn display_pretty<'a>(
        &'a self,
        path: &'a Path,
        source: &'a str,
    ) -> impl std::fmt::Display + 'a {
        DisplayParseErrorPretty {
            error: self,
            path,
            source,
        }
    }
}

struct DisplayParseErrorPretty<'a> {
    error: &'a ParseError,
    path: &'a Path,
    source: &'a str,
}

impl std::fmt::Display for DisplayParseErrorPretty<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let location = self.error.location();
        writeln!(f, "{}", self.error)?;
        write!(
            f,
            "{}",
            Excerpt::from_source(
                self.path,
                self.source,
                location.row,
                location.column..location.column + 1,
                2
            )
        )
    }
}

/// An excerpt of one line of a script, with a caret marking a range of columns.
struct Excerpt<'a> {
    path: &'a Path,
    source: Option<&'a str>,
    row: usize,
    columns: Range<usize>,
    indent: usize,
}

impl<'a> Excerpt<'a> {
    fn from_source(
        path: &'a Path,
        source: &'a str,
        row: usize,
        columns: Range<usize>,
        indent: usize,
    ) -> Excerpt<'a> {
        Excerpt {
            path,
            source: source.lines().nth(row),
            row,
            columns,
            indent,
        }
    }

    fn gutter_width(&self) -> usize {
        ((self.row + 1) as f64).log10() as usize + 1
    }
}

impl<'a> std::fmt::Display for Excerpt<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "{}{}:{}:{}:",
            " ".repeat(self.indent),
            white_bold(self.path.to_str().unwrap_or("<unknown file>")),
            white_bold(&format!("{}", self.row + 1)),
            white_bold(&format!("{}", self.columns.start + 1)),
        )?;
        match self.source {
            Some(source) => {
                writeln!(
                    f,
                    "{}{}{}{}",
                    " ".repeat(self.indent),
                    blue(&format!("{}", self.row + 1)),
                    blue(" | "),
                    source,
                )?;
                writeln!(
                    f,
                    "{}{}{}{}{}",
                    " ".repeat(self.indent),
                    " ".repeat(self.gutter_width()),
                    blue(" | "),
                    " ".repeat(self.columns.start),
                    green_bold(&"^".repeat(self.columns.len().max(1)))
                )?;
            }
            // errors at the very end of a script point past its last line
            None => writeln!(f, "{}<end of script>", " ".repeat(self.indent))?,
        }
        Ok(())
    }
}

#[cfg(feature = "term-colors")]
fn blue(str: &str) -> impl std::fmt::Display {
    str.blue()
}
#[cfg(not(feature = "term-colors"))]
fn blue<'a>(str: &'a str) -> impl std::fmt::Display + 'a {
    str
}

#[cfg(feature = "term-colors")]
fn green_bold(str: &str) -> impl std::fmt::Display {
    str.green().bold()
}
#[cfg(not(feature = "term-colors"))]
fn green_bold<'a>(str: &'a str) -> impl std::fmt::Display + 'a {
    str
}

#[cfg(feature = "term-colors")]
fn white_bold(str: &str) -> impl std::fmt::Display {
    str.white().bold()
}
#[cfg(not(feature = "term-colors"))]
fn white_bold<'a>(str: &'a str) -> impl std::fmt::Display + 'a {
    str
}
