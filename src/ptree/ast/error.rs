//! Recoverable parse errors
//!
//! The builder never stops at a bad line: it records one of these and moves on.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// Tree-shaped line that breaks the node grammar
    UnrecognizedLine,
    /// Root-like text after the root was already set
    UnexpectedText,
    /// Depth grows by more than one level
    DepthJump,
    /// Directive block still open at end of input
    UnclosedBracket,
    MalformedDirective,
}

/// One recovered error, anchored at a 0-indexed line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
    /// Column span (in characters) within the line
    pub span: Option<(usize, usize)>,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            span: None,
            kind,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some((start, _)) => write!(f, "{}:{}: {}", self.line + 1, start + 1, self.message),
            None => write!(f, "{}: {}", self.line + 1, self.message),
        }
    }
}

impl std::error::Error for ParseError {}
