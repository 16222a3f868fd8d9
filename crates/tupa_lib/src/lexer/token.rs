//! Token representation for the Tupã lexer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,
    String,
    Bool,
    Ident,

    // Keywords
    Criar,
    Mostrar,
    Pegar,
    Se,
    Entao,
    Senao,
    Fim,
    Enquanto,
    Fazer,
    Para,
    De,
    Ate,
    Em,
    Funcao,
    Devolver,
    Classe,
    Tentar,
    ErroKw,
    Usar,
    Lista,
    Dicionario,
    E,
    Ou,
    Nao,

    // Punctuation / operators
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Assign,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Eof,
}

/// The already-decoded literal payload for `NUMBER`, `STRING` and `BOOL`
/// tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexeme {
    Int(i64),
    Real(f64),
    Str(String),
    Bool(bool),
    Ident(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<Lexeme>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: Option<Lexeme>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
        }
    }

    pub fn text(&self) -> String {
        match &self.lexeme {
            Some(Lexeme::Int(v)) => v.to_string(),
            Some(Lexeme::Real(v)) => v.to_string(),
            Some(Lexeme::Str(v)) => v.clone(),
            Some(Lexeme::Bool(v)) => v.to_string(),
            Some(Lexeme::Ident(v)) => v.clone(),
            None => format!("{:?}", self.kind),
        }
    }
}
