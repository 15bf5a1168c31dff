use crate::lexer::Token;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum InnerParseError {
    #[error("expected token {0}, but got {1}")]
    ExpectedButGot(Token, Token),
    #[error("expected identifier, but got {0}")]
    ExpectedIdentifierButGot(Token),
    #[error("expected literal, but got {0}")]
    ExpectedLiteralButGot(Token),
    #[error("expected type, but got {0}")]
    ExpectedTypeButGot(Token),
    #[error("vector size must be an integer literal, but got {0}")]
    BadVectorSize(Token),
    #[error("unexpected token {0}")]
    UnexpectedToken(Token),
    #[error("bad factor {0}")]
    BadFactor(Token),
    #[error("trailing comma in parameter list")]
    TrailingComma,
    #[error("only float declarations take a divisor")]
    DivisorOutsideFloat,
    #[error("reached unexpected EOF")]
    UnexpectedEof,
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("line {ln}: {inner}")]
pub struct ParseError {
    pub inner: InnerParseError,
    pub ln: u64,
}

impl ParseError {
    pub fn get_ln(&self) -> u64 {
        self.ln
    }
}

impl InnerParseError {
    pub fn set_line(self, ln: u64) -> ParseError {
        ParseError { inner: self, ln }
    }
}
