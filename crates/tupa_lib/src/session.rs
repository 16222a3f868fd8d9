//! Entry points shared by the file runner and the REPL.

use crate::error::TupaError;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// One running program: owns the interpreter state across calls, so a
/// REPL can evaluate line after line against accumulated bindings.
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// Lexes, parses and executes `source` as a full program, restarting
    /// the interpreter's scope chain (used for whole-file execution).
    pub fn run_source(source: &str) -> Result<(), TupaError> {
        let mut session = Self::new();
        session.eval_in_session(source).map(|_| ())
    }

    /// Lexes, parses and executes `source` against this session's existing
    /// interpreter, so declarations made by a previous call remain visible.
    pub fn eval_in_session(&mut self, source: &str) -> Result<(), TupaError> {
        let tokens = Lexer::tokenize(source)?;
        let program = Parser::parse(tokens)?;
        self.interpreter.exec_program(&program)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_executes_a_full_program() {
        assert!(Session::run_source("mostrar 1 + 1").is_ok());
    }

    #[test]
    fn eval_in_session_accumulates_declarations() {
        let mut session = Session::new();
        session.eval_in_session("criar x = 10").unwrap();
        session.eval_in_session("mostrar x + 1").unwrap();
    }

    #[test]
    fn lex_or_parse_errors_surface_to_the_caller() {
        assert!(Session::run_source("criar = 1").is_err());
    }
}
