//! UTF-8 source text to token stream.
//!
//! Hand-rolled character-class scanning over a peekable char iterator with
//! a running line/column cursor; keywords are recognized by looking up an
//! already-scanned identifier run against a lazily-built static map rather
//! than matching keyword characters inline.

mod token;

pub use token::*;

use crate::error::TupaError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = HashMap::new();
    m.insert("criar", Criar);
    m.insert("mostrar", Mostrar);
    m.insert("pegar", Pegar);
    m.insert("se", Se);
    m.insert("então", Entao);
    m.insert("senão", Senao);
    m.insert("fim", Fim);
    m.insert("enquanto", Enquanto);
    m.insert("fazer", Fazer);
    m.insert("para", Para);
    m.insert("de", De);
    m.insert("até", Ate);
    m.insert("em", Em);
    m.insert("função", Funcao);
    m.insert("devolver", Devolver);
    m.insert("classe", Classe);
    m.insert("tentar", Tentar);
    m.insert("erro", ErroKw);
    m.insert("usar", Usar);
    m.insert("lista", Lista);
    m.insert("dicionário", Dicionario);
    m.insert("verdadeiro", Bool);
    m.insert("falso", Bool);
    m.insert("e", E);
    m.insert("ou", Ou);
    m.insert("não", Nao);
    m
});

/// ASCII letters/digits/underscore plus the accented Portuguese vowel and
/// cedilla set, both cases.
const ACCENTED: &str = "áàâãéèêíìîóòôõúùûçÁÀÂÃÉÈÊÍÌÎÓÒÔÕÚÙÛÇ";

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || ACCENTED.contains(c)
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            tokens: vec![],
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(source: &'a str) -> Result<Vec<Token>, TupaError> {
        Self::new(source).lex()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&mut self) -> Option<char> {
        let mut clone = self.chars.clone();
        clone.next();
        clone.next()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.chars.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        next
    }

    fn push(&mut self, kind: TokenKind, lexeme: Option<Lexeme>, line: usize, column: usize) {
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    pub fn lex(mut self) -> Result<Vec<Token>, TupaError> {
        loop {
            self.skip_whitespace_and_comments();

            let (line, column) = (self.line, self.column);
            let Some(c) = self.peek() else {
                self.push(TokenKind::Eof, None, line, column);
                break;
            };

            if is_ident_start(c) {
                self.lex_identifier();
            } else if c.is_ascii_digit() {
                self.lex_number();
            } else if c == '"' || c == '\'' {
                self.lex_string(c)?;
            } else {
                self.lex_operator()?;
            }
        }

        Ok(self.tokens)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_second() == Some('/') => {
                    while !matches!(self.peek(), Some('\n') | None) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match KEYWORDS.get(text.as_str()) {
            Some(TokenKind::Bool) => {
                let value = text == "verdadeiro";
                self.push(TokenKind::Bool, Some(Lexeme::Bool(value)), line, column);
            }
            Some(kind) => self.push(*kind, None, line, column),
            None => self.push(TokenKind::Ident, Some(Lexeme::Ident(text)), line, column),
        }
    }

    fn lex_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let mut is_real = false;
        if self.peek() == Some('.') {
            if let Some(next) = self.peek_second() {
                if next.is_ascii_digit() {
                    is_real = true;
                    text.push('.');
                    self.advance();
                    while let Some(c) = self.peek() {
                        if c.is_ascii_digit() {
                            text.push(c);
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
            }
        }

        if is_real {
            let value: f64 = text.parse().expect("scanned digits parse as real");
            self.push(TokenKind::Number, Some(Lexeme::Real(value)), line, column);
        } else {
            let value: i64 = text.parse().expect("scanned digits parse as integer");
            self.push(TokenKind::Number, Some(Lexeme::Int(value)), line, column);
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<(), TupaError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(TupaError::lex(
                        "string não terminada",
                        line,
                        column,
                    ))
                }
            }
        }
        self.push(TokenKind::String, Some(Lexeme::Str(text)), line, column);
        Ok(())
    }

    fn lex_operator(&mut self) -> Result<(), TupaError> {
        let (line, column) = (self.line, self.column);
        let c = self.advance().expect("caller checked peek");

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(TupaError::lex("caractere inválido '!'", line, column));
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            other => {
                return Err(TupaError::lex(
                    format!("caractere inválido '{other}'"),
                    line,
                    column,
                ))
            }
        };

        self.push(kind, None, line, column);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("criar n = 10"),
            vec![
                TokenKind::Criar,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_accented_identifier() {
        let tokens = Lexer::tokenize("criar tamanhão = 1").unwrap();
        assert_eq!(
            tokens[1].lexeme,
            Some(Lexeme::Ident("tamanhão".to_string()))
        );
    }

    #[test]
    fn minus_is_always_a_token_never_part_of_a_number() {
        let tokens = Lexer::tokenize("-10").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Minus);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].lexeme, Some(Lexeme::Int(10)));
    }

    #[test]
    fn real_literal_requires_digit_after_dot() {
        let tokens = Lexer::tokenize("3.14").unwrap();
        assert_eq!(tokens[0].lexeme, Some(Lexeme::Real(3.14)));

        // a bare trailing dot (e.g. method/attr access) must not be folded
        // into the number
        let tokens = Lexer::tokenize("3.tamanho").unwrap();
        assert_eq!(tokens[0].lexeme, Some(Lexeme::Int(3)));
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("== != <= >= = <"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Assign,
                TokenKind::Lt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bang_alone_is_a_lex_error() {
        assert!(Lexer::tokenize("!").is_err());
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        assert!(Lexer::tokenize("\"abc").is_err());
    }

    #[test]
    fn line_comment_consumed_to_newline() {
        let tokens = Lexer::tokenize("mostrar 1 // comentário\nmostrar 2").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Mostrar,
                TokenKind::Number,
                TokenKind::Mostrar,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn booleans_carry_their_value() {
        let tokens = Lexer::tokenize("verdadeiro falso").unwrap();
        assert_eq!(tokens[0].lexeme, Some(Lexeme::Bool(true)));
        assert_eq!(tokens[1].lexeme, Some(Lexeme::Bool(false)));
    }
}
