//! Expression nodes. Each variant carries only the operands it needs, plus
//! the source position of the operator/keyword token used to build it, so
//! diagnostics can reference a line and column.

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Real(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable {
        name: String,
        line: usize,
        column: usize,
    },
    Group(Box<Expr>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        line: usize,
        column: usize,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
        column: usize,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        name: String,
        value: Box<Expr>,
        line: usize,
        column: usize,
    },
    IndexAssign {
        target: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
        line: usize,
        column: usize,
    },
    AttrAssign {
        target: Box<Expr>,
        attr: String,
        value: Box<Expr>,
        line: usize,
        column: usize,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
        column: usize,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
        line: usize,
        column: usize,
    },
    Attr {
        target: Box<Expr>,
        attr: String,
        line: usize,
        column: usize,
    },
    ListLit(Vec<Expr>),
    DictLit(Vec<(Expr, Expr)>),
}

impl Expr {
    /// Best-effort source position, used by the parser to validate
    /// assignment targets and by the evaluator to annotate runtime errors.
    pub fn position(&self) -> (usize, usize) {
        match self {
            Expr::Variable { line, column, .. }
            | Expr::Unary { line, column, .. }
            | Expr::Binary { line, column, .. }
            | Expr::Assign { line, column, .. }
            | Expr::IndexAssign { line, column, .. }
            | Expr::AttrAssign { line, column, .. }
            | Expr::Call { line, column, .. }
            | Expr::Index { line, column, .. }
            | Expr::Attr { line, column, .. } => (*line, *column),
            Expr::Group(inner) | Expr::Logical { left: inner, .. } => inner.position(),
            Expr::Literal(_) | Expr::ListLit(_) | Expr::DictLit(_) => (0, 0),
        }
    }
}
