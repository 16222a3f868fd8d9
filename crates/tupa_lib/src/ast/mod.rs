//! AST node definitions for a Tupã program.
//!
//! One enum per syntactic category, `Expr` and `Stmt`, each variant a
//! plain struct-like payload rather than a generically-annotated node —
//! there is no type checker here to hang an annotation slot off of.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

pub type Program = Vec<Stmt>;
