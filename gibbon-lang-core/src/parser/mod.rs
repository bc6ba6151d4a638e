pub mod error;
pub mod expressions;
pub mod statements;

use crate::lexer::{Token, TokenKind};
pub use error::ParseError;
use statements::parse_statement;

pub struct Parser<'a> {
    pub iter: std::iter::Peekable<crate::lexer::Tokenizer<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: crate::lexer::Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self { iter }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(
                error::Expected::Identifier,
                token,
            )),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    /// Parses statements until the token stream is exhausted. The first
    /// structural error aborts the parse; no partial program is returned.
    pub fn parse_program(&mut self) -> Result<crate::ast::Program, ParseError> {
        let mut statements = Vec::new();

        while self.iter.peek().is_some() {
            statements.push(parse_statement(self)?);
            // Statement separators at the top level are optional.
            self.iter
                .next_if(|token| token.kind == TokenKind::SemiColon);
        }

        Ok(crate::ast::Program { statements })
    }
}
