//! Statement nodes.

use super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Plain,
    Lista,
    Dicionario,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub attrs: Vec<(String, Expr)>,
    pub methods: Vec<FuncDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl {
        kind: VarKind,
        name: String,
        value: Expr,
    },
    Print(Expr),
    Input {
        name: String,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    ForRange {
        var: String,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },
    ForEach {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    FuncDecl(FuncDecl),
    Return(Option<Expr>),
    ClassDecl(ClassDecl),
    TryCatch {
        try_block: Vec<Stmt>,
        catch_var: String,
        catch_block: Vec<Stmt>,
    },
    Use {
        module: String,
    },
    ExprStmt(Expr),
}
