//! Error kinds for the Tupã pipeline (lex, parse, evaluate).
//!
//! Manual `Display`/`Error` impls rather than `thiserror`, so a diagnostic
//! can carry an optional line/column and render as a single colored line.

use colored::Colorize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupaErrorKind {
    Lex,
    Syntax,
    Name,
    Type,
    Index,
    Attr,
    Value,
}

impl fmt::Display for TupaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Lex => "LexError",
            Self::Syntax => "SyntaxError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::Index => "IndexError",
            Self::Attr => "AttrError",
            Self::Value => "ValueError",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupaError {
    pub kind: TupaErrorKind,
    pub message: String,
    pub position: Option<(usize, usize)>,
}

impl TupaError {
    pub fn new(kind: TupaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(kind: TupaErrorKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Some((line, column)),
        }
    }

    pub fn lex(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::at(TupaErrorKind::Lex, message, line, column)
    }

    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::at(TupaErrorKind::Syntax, message, line, column)
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(TupaErrorKind::Name, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(TupaErrorKind::Type, message)
    }

    pub fn index(message: impl Into<String>) -> Self {
        Self::new(TupaErrorKind::Index, message)
    }

    pub fn attr(message: impl Into<String>) -> Self {
        Self::new(TupaErrorKind::Attr, message)
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::new(TupaErrorKind::Value, message)
    }

    /// The text bound under a `tentar`/`pegar` catch variable.
    pub fn catch_text(&self) -> String {
        self.message.clone()
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.position = Some((line, column));
        self
    }
}

impl fmt::Display for TupaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, column)) => write!(
                f,
                "{} ({line}:{column})",
                self.message,
                line = line,
                column = column
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TupaError {}

/// Formats a `TupaError` the way the CLI prints it: `Erro: <message>`.
pub fn format_for_user(err: &TupaError) -> String {
    format!("{} {}", "Erro:".red(), err)
}
