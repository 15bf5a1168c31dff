use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum InnerLexError {
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("bad multi-char operator: {0}")]
    BadMcharOperator(String),
    #[error("bad constant suffix: {0}")]
    BadConstantSuffix(char),
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("line {ln}: {inner}")]
pub struct LexError {
    inner: InnerLexError,
    ln: u64,
}

impl LexError {
    pub fn get_ln(&self) -> u64 {
        self.ln
    }

    pub fn get_inner(&self) -> &InnerLexError {
        &self.inner
    }
}

impl InnerLexError {
    pub(super) fn set_line(self, ln: u64) -> LexError {
        LexError { inner: self, ln }
    }
}
