use crate::ast::SymbolNode;
use crate::lexer::{LinedToken, Token};
use crate::parser::{InnerParseError, Result};
use crate::symtab::{SymbolKind, SymbolTable};

/// Token cursor that also registers every literal and identifier it hands out.
#[derive(Debug)]
pub struct Cursor<'a> {
    tokens: &'a [LinedToken],
    position: usize,
    table: &'a mut SymbolTable,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [LinedToken], table: &'a mut SymbolTable) -> Self {
        Self {
            tokens,
            position: 0,
            table,
        }
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position).map(LinedToken::get_inner)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens
            .get(self.position + n)
            .map(LinedToken::get_inner)
    }

    pub fn bump(&mut self) {
        self.position += 1;
    }

    pub fn bump_if(&mut self, t: &Token) -> bool {
        let condition = self.peek() == Some(t);
        if condition {
            self.bump();
        }
        condition
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Line of the current token, or of the last one once the input is exhausted.
    pub fn get_line(&self) -> u64 {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, LinedToken::get_line)
    }

    pub fn expect(&mut self, t: &Token) -> Result<()> {
        let line = self.get_line();
        let next = self.next_or_error()?;
        if next == t {
            Ok(())
        } else {
            Err(InnerParseError::ExpectedButGot(t.clone(), next.clone()).set_line(line))
        }
    }

    pub fn peek_or_error(&self) -> Result<&'a Token> {
        self.peek()
            .ok_or_else(|| InnerParseError::UnexpectedEof.set_line(self.get_line()))
    }

    pub fn next_or_error(&mut self) -> Result<&'a Token> {
        let next = self.peek_or_error()?;
        self.position += 1;
        Ok(next)
    }

    /// Register `value` in the symbol table and build a leaf for it.
    pub fn add_symbol(&mut self, value: &str, kind: SymbolKind, line: u64) -> SymbolNode {
        let id = self.table.add(value, kind, line);
        SymbolNode::new(id, line)
    }
}
