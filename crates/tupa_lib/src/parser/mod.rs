//! Recursive-descent parser with a precedence climb for expressions.
//!
//! One function per precedence level, each falling through to the next
//! tighter-binding level when its own operator doesn't match. Plain
//! recursive descent rather than a combinator DSL — the grammar here is
//! small enough that combinator machinery would only add indirection.

use crate::ast::*;
use crate::error::TupaError;
use crate::lexer::{Lexeme, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

type PResult<T> = Result<T, TupaError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(tokens: Vec<Token>) -> PResult<Program> {
        Self::new(tokens).parse_program()
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind())
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn consume(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let tok = self.current();
            Err(TupaError::syntax(
                format!(
                    "esperava {what} mas encontrou {:?}",
                    tok.kind
                ),
                tok.line,
                tok.column,
            ))
        }
    }

    fn consume_ident(&mut self, what: &str) -> PResult<String> {
        let tok = self.consume(TokenKind::Ident, what)?;
        match tok.lexeme {
            Some(Lexeme::Ident(name)) => Ok(name),
            _ => unreachable!("Ident token always carries a Lexeme::Ident"),
        }
    }

    // ---- program / statements ----------------------------------------

    fn parse_program(&mut self) -> PResult<Program> {
        let mut stmts = vec![];
        while !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    /// Parses statements until the current token matches one of `stop`.
    /// Used for every block body (`se`/`enquanto`/`para`/`função`/`classe`/
    /// `tentar`), each closed by its own combination of terminators.
    fn parse_block(&mut self, stop: &[TokenKind]) -> PResult<Vec<Stmt>> {
        let mut stmts = vec![];
        while !self.at_any(stop) && !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        if self.check(TokenKind::Eof) {
            let tok = self.current();
            return Err(TupaError::syntax(
                "fim de arquivo inesperado, 'fim' faltando",
                tok.line,
                tok.column,
            ));
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> PResult<Stmt> {
        match self.kind() {
            TokenKind::Criar => self.parse_var_decl(),
            TokenKind::Mostrar => self.parse_print(),
            TokenKind::Pegar => self.parse_input(),
            TokenKind::Se => self.parse_if(),
            TokenKind::Enquanto => self.parse_while(),
            TokenKind::Para => self.parse_for(),
            TokenKind::Funcao => self.parse_func_decl().map(Stmt::FuncDecl),
            TokenKind::Devolver => self.parse_return(),
            TokenKind::Classe => self.parse_class_decl(),
            TokenKind::Tentar => self.parse_try(),
            TokenKind::Usar => self.parse_use(),
            _ => Ok(Stmt::ExprStmt(self.parse_expr()?)),
        }
    }

    fn parse_var_decl(&mut self) -> PResult<Stmt> {
        self.advance(); // criar
        let kind = match self.kind() {
            TokenKind::Lista => {
                self.advance();
                VarKind::Lista
            }
            TokenKind::Dicionario => {
                self.advance();
                VarKind::Dicionario
            }
            _ => VarKind::Plain,
        };
        let name = self.consume_ident("um identificador")?;
        self.consume(TokenKind::Assign, "'='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::VarDecl { kind, name, value })
    }

    fn parse_print(&mut self) -> PResult<Stmt> {
        self.advance(); // mostrar
        Ok(Stmt::Print(self.parse_expr()?))
    }

    fn parse_input(&mut self) -> PResult<Stmt> {
        self.advance(); // pegar
        let name = self.consume_ident("um identificador")?;
        Ok(Stmt::Input { name })
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        self.advance(); // se
        let condition = self.parse_expr()?;
        self.consume(TokenKind::Entao, "'então'")?;
        let then_block = self.parse_block(&[TokenKind::Senao, TokenKind::Fim])?;
        let else_block = if self.check(TokenKind::Senao) {
            self.advance();
            self.parse_block(&[TokenKind::Fim])?
        } else {
            vec![]
        };
        self.consume(TokenKind::Fim, "'fim'")?;
        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        self.advance(); // enquanto
        let condition = self.parse_expr()?;
        self.consume(TokenKind::Fazer, "'fazer'")?;
        let body = self.parse_block(&[TokenKind::Fim])?;
        self.consume(TokenKind::Fim, "'fim'")?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.advance(); // para
        let var = self.consume_ident("um identificador")?;
        match self.kind() {
            TokenKind::Em => {
                self.advance();
                let iterable = self.parse_expr()?;
                self.consume(TokenKind::Fazer, "'fazer'")?;
                let body = self.parse_block(&[TokenKind::Fim])?;
                self.consume(TokenKind::Fim, "'fim'")?;
                Ok(Stmt::ForEach {
                    var,
                    iterable,
                    body,
                })
            }
            TokenKind::De => {
                self.advance();
                let start = self.parse_expr()?;
                self.consume(TokenKind::Ate, "'até'")?;
                let end = self.parse_expr()?;
                self.consume(TokenKind::Fazer, "'fazer'")?;
                let body = self.parse_block(&[TokenKind::Fim])?;
                self.consume(TokenKind::Fim, "'fim'")?;
                Ok(Stmt::ForRange {
                    var,
                    start,
                    end,
                    body,
                })
            }
            _ => {
                let tok = self.current();
                Err(TupaError::syntax(
                    "esperava 'em' ou 'de' em laço 'para'",
                    tok.line,
                    tok.column,
                ))
            }
        }
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        self.advance(); // função
        let name = self.consume_ident("um identificador")?;
        self.consume(TokenKind::LParen, "'('")?;
        let mut params = vec![];
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.consume_ident("um identificador")?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "')'")?;
        let body = self.parse_block(&[TokenKind::Fim])?;
        self.consume(TokenKind::Fim, "'fim'")?;
        Ok(FuncDecl { name, params, body })
    }

    fn parse_return(&mut self) -> PResult<Stmt> {
        self.advance(); // devolver
        Ok(Stmt::Return(Some(self.parse_expr()?)))
    }

    fn parse_class_decl(&mut self) -> PResult<Stmt> {
        self.advance(); // classe
        let name = self.consume_ident("um identificador")?;
        let mut attrs = vec![];
        let mut methods = vec![];
        while !self.check(TokenKind::Fim) && !self.check(TokenKind::Eof) {
            match self.kind() {
                TokenKind::Criar => {
                    self.advance();
                    // The `lista`/`dicionário` type tag is informational
                    // only (spec.md §4.4), same as a top-level `criar`; an
                    // attribute initializer may carry it too.
                    if self.at_any(&[TokenKind::Lista, TokenKind::Dicionario]) {
                        self.advance();
                    }
                    let attr_name = self.consume_ident("um identificador")?;
                    self.consume(TokenKind::Assign, "'='")?;
                    let value = self.parse_expr()?;
                    attrs.push((attr_name, value));
                }
                TokenKind::Funcao => {
                    methods.push(self.parse_func_decl()?);
                }
                _ => {
                    let tok = self.current();
                    return Err(TupaError::syntax(
                        "esperava declaração de atributo ou método em 'classe'",
                        tok.line,
                        tok.column,
                    ));
                }
            }
        }
        self.consume(TokenKind::Fim, "'fim'")?;
        Ok(Stmt::ClassDecl(ClassDecl {
            name,
            attrs,
            methods,
        }))
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        self.advance(); // tentar
        let try_block = self.parse_block(&[TokenKind::Pegar])?;
        self.consume(TokenKind::Pegar, "'pegar'")?;
        let catch_var = self.consume_ident("um identificador")?;
        let catch_block = self.parse_block(&[TokenKind::Fim])?;
        self.consume(TokenKind::Fim, "'fim'")?;
        Ok(Stmt::TryCatch {
            try_block,
            catch_var,
            catch_block,
        })
    }

    fn parse_use(&mut self) -> PResult<Stmt> {
        self.advance(); // usar
        let module = self.consume_ident("um identificador")?;
        Ok(Stmt::Use { module })
    }

    // ---- expressions (precedence climb, lowest to highest) -----------

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> PResult<Expr> {
        let target = self.parse_or()?;

        if !self.check(TokenKind::Assign) {
            return Ok(target);
        }

        let eq_tok = self.advance();
        let value = self.parse_assignment()?;

        match target {
            Expr::Variable { name, .. } => Ok(Expr::Assign {
                name,
                value: Box::new(value),
                line: eq_tok.line,
                column: eq_tok.column,
            }),
            Expr::Index { target, index, .. } => Ok(Expr::IndexAssign {
                target,
                index,
                value: Box::new(value),
                line: eq_tok.line,
                column: eq_tok.column,
            }),
            Expr::Attr { target, attr, .. } => Ok(Expr::AttrAssign {
                target,
                attr,
                value: Box::new(value),
                line: eq_tok.line,
                column: eq_tok.column,
            }),
            _ => Err(TupaError::syntax(
                "alvo de atribuição inválido",
                eq_tok.line,
                eq_tok.column,
            )),
        }
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Ou) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::E) {
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut left = self.parse_comparison()?;
        while self.at_any(&[TokenKind::EqEq, TokenKind::NotEq]) {
            let tok = self.advance();
            let op = if tok.kind == TokenKind::EqEq {
                BinaryOp::Eq
            } else {
                BinaryOp::NotEq
            };
            let right = self.parse_comparison()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: tok.line,
                column: tok.column,
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let mut left = self.parse_additive()?;
        while self.at_any(&[
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ]) {
            let tok = self.advance();
            let op = match tok.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                _ => BinaryOp::GtEq,
            };
            let right = self.parse_additive()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: tok.line,
                column: tok.column,
            };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        while self.at_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let tok = self.advance();
            let op = if tok.kind == TokenKind::Plus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: tok.line,
                column: tok.column,
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut left = self.parse_unary()?;
        while self.at_any(&[TokenKind::Star, TokenKind::Slash]) {
            let tok = self.advance();
            let op = if tok.kind == TokenKind::Star {
                BinaryOp::Mul
            } else {
                BinaryOp::Div
            };
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                line: tok.line,
                column: tok.column,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        if self.at_any(&[TokenKind::Minus, TokenKind::Nao]) {
            let tok = self.advance();
            let op = if tok.kind == TokenKind::Minus {
                UnaryOp::Neg
            } else {
                UnaryOp::Not
            };
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
                line: tok.line,
                column: tok.column,
            });
        }
        self.parse_call()
    }

    fn parse_call(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.kind() {
                TokenKind::LParen => {
                    let tok = self.advance();
                    let mut args = vec![];
                    if !self.check(TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if self.check(TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.consume(TokenKind::RParen, "')'")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        line: tok.line,
                        column: tok.column,
                    };
                }
                TokenKind::LBracket => {
                    let tok = self.advance();
                    let index = self.parse_expr()?;
                    self.consume(TokenKind::RBracket, "']'")?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                        line: tok.line,
                        column: tok.column,
                    };
                }
                TokenKind::Dot => {
                    let tok = self.advance();
                    let attr = self.consume_ident("um identificador")?;
                    expr = Expr::Attr {
                        target: Box::new(expr),
                        attr,
                        line: tok.line,
                        column: tok.column,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                match tok.lexeme {
                    Some(Lexeme::Int(v)) => Ok(Expr::Literal(Literal::Int(v))),
                    Some(Lexeme::Real(v)) => Ok(Expr::Literal(Literal::Real(v))),
                    _ => unreachable!("Number token always carries Int or Real"),
                }
            }
            TokenKind::String => {
                self.advance();
                match tok.lexeme {
                    Some(Lexeme::Str(v)) => Ok(Expr::Literal(Literal::Str(v))),
                    _ => unreachable!("String token always carries Lexeme::Str"),
                }
            }
            TokenKind::Bool => {
                self.advance();
                match tok.lexeme {
                    Some(Lexeme::Bool(v)) => Ok(Expr::Literal(Literal::Bool(v))),
                    _ => unreachable!("Bool token always carries Lexeme::Bool"),
                }
            }
            TokenKind::Ident => {
                self.advance();
                match tok.lexeme {
                    Some(Lexeme::Ident(name)) => Ok(Expr::Variable {
                        name,
                        line: tok.line,
                        column: tok.column,
                    }),
                    _ => unreachable!("Ident token always carries Lexeme::Ident"),
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.consume(TokenKind::RParen, "')'")?;
                Ok(Expr::Group(Box::new(inner)))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = vec![];
                if !self.check(TokenKind::RBracket) {
                    loop {
                        items.push(self.parse_expr()?);
                        if self.check(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RBracket, "']'")?;
                Ok(Expr::ListLit(items))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = vec![];
                if !self.check(TokenKind::RBrace) {
                    loop {
                        let key = self.parse_expr()?;
                        self.consume(TokenKind::Colon, "':'")?;
                        let value = self.parse_expr()?;
                        entries.push((key, value));
                        if self.check(TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.consume(TokenKind::RBrace, "'}'")?;
                Ok(Expr::DictLit(entries))
            }
            _ => Err(TupaError::syntax(
                format!("token inesperado {:?}", tok.kind),
                tok.line,
                tok.column,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Program {
        let tokens = Lexer::tokenize(source).unwrap();
        Parser::parse(tokens).unwrap()
    }

    #[test]
    fn parses_if_else() {
        let program = parse("se verdadeiro então\nmostrar 1\nsenão\nmostrar 2\nfim");
        assert_eq!(program.len(), 1);
        assert!(matches!(program[0], Stmt::If { .. }));
    }

    #[test]
    fn assignment_to_index_rewrites_to_index_assign() {
        let program = parse("criar xs = [1, 2]\nxs[0] = 9");
        assert!(matches!(program[1], Stmt::ExprStmt(Expr::IndexAssign { .. })));
    }

    #[test]
    fn invalid_assignment_target_is_syntax_error() {
        let tokens = Lexer::tokenize("1 = 2").unwrap();
        assert!(Parser::parse(tokens).is_err());
    }

    #[test]
    fn missing_fim_is_syntax_error() {
        let tokens = Lexer::tokenize("se verdadeiro então\nmostrar 1").unwrap();
        assert!(Parser::parse(tokens).is_err());
    }

    #[test]
    fn precedence_climbs_correctly() {
        // 1 + 2 * 3 == 7, not 9
        let program = parse("mostrar 1 + 2 * 3");
        let Stmt::Print(Expr::Binary { op: BinaryOp::Add, right, .. }) = &program[0] else {
            panic!("expected an addition at the top");
        };
        assert!(matches!(**right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn for_range_and_for_each_parse_distinctly() {
        let program = parse("para i de 1 até 3 fazer\nmostrar i\nfim");
        assert!(matches!(program[0], Stmt::ForRange { .. }));

        let program = parse("para x em xs fazer\nmostrar x\nfim");
        assert!(matches!(program[0], Stmt::ForEach { .. }));
    }

    #[test]
    fn empty_list_and_dict_literals_parse() {
        let program = parse("criar xs = []\ncriar d = {}");
        assert!(matches!(
            &program[0],
            Stmt::VarDecl { value: Expr::ListLit(items), .. } if items.is_empty()
        ));
        assert!(matches!(
            &program[1],
            Stmt::VarDecl { value: Expr::DictLit(entries), .. } if entries.is_empty()
        ));
    }

    #[test]
    fn class_attribute_accepts_the_lista_type_tag() {
        let program = parse("classe Caixa\ncriar lista itens = []\nfim");
        let Stmt::ClassDecl(decl) = &program[0] else {
            panic!("expected a class declaration");
        };
        assert_eq!(decl.attrs[0].0, "itens");
    }

    #[test]
    fn try_catch_disambiguates_pegar_as_catch_marker() {
        let program = parse("tentar\nmostrar 1\npegar e\nmostrar e\nfim");
        assert!(matches!(program[0], Stmt::TryCatch { .. }));
    }
}
