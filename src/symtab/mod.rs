//! Scope-partitioned symbol table.
//!
//! Every symbol lives in one arena and is addressed by [`SymbolId`]. The hash part is a fixed
//! array of [`TABLE_SIZE`] buckets keyed by the symbol's text only, so rebinding a symbol's
//! scope never moves it. Two symbols are the same entry when both text and [`Scope`] match.


use std::fmt;
use std::ops::{Index, IndexMut};

pub const TABLE_SIZE: usize = 1009;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Scope {
    #[default]
    Global,
    Function(SymbolId),
}

impl Scope {
    pub fn function(self) -> Option<SymbolId> {
        match self {
            Self::Global => None,
            Self::Function(id) => Some(id),
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SymbolKind {
    IntLiteral,
    CharLiteral,
    StringLiteral,
    /// Identifier seen by the parser but not yet bound by semantic analysis
    Identifier,
    Variable,
    Vector,
    Function,
    Parameter,
    Label,
}

impl SymbolKind {
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral | Self::CharLiteral | Self::StringLiteral
        )
    }

    #[inline]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Identifier)
    }

    /// Kinds that can be read or written as a plain value
    #[inline]
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Variable | Self::Parameter) || self.is_literal()
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DataType {
    #[default]
    Undefined,
    Int,
    Char,
    Float,
    String,
    Bool,
}

impl DataType {
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Char | Self::Float)
    }

    /// Storage size in bytes of a value of this type
    pub fn size(self) -> u64 {
        match self {
            Self::Int | Self::Float => 4,
            Self::Char | Self::Bool => 1,
            Self::String | Self::Undefined => 8,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub value: String,
    pub kind: SymbolKind,
    pub data_type: DataType,
    pub scope: Scope,
    /// Line of first definition
    pub line: u64,
    /// Ordered parameters, only ever filled for functions
    pub parameters: Vec<SymbolId>,
}

impl Symbol {
    fn new(value: String, kind: SymbolKind, line: u64, scope: Scope) -> Self {
        Self {
            value,
            kind,
            data_type: DataType::Undefined,
            scope,
            line,
            parameters: Vec::new(),
        }
    }

    /// Type carried by a literal's text, `None` for anything that is not a literal.
    pub fn literal_type(&self) -> Option<DataType> {
        match self.kind {
            SymbolKind::IntLiteral => Some(DataType::Int),
            SymbolKind::CharLiteral => Some(DataType::Char),
            SymbolKind::StringLiteral => Some(DataType::String),
            _ => None,
        }
    }

    /// Numeric value of an int or char literal (`'a'` is 97).
    pub fn literal_value(&self) -> Option<i64> {
        match self.kind {
            SymbolKind::IntLiteral => self.value.parse().ok(),
            SymbolKind::CharLiteral => {
                let inner = self.value.strip_prefix('\'')?.strip_suffix('\'')?;
                let mut chars = inner.chars();
                let c = match chars.next()? {
                    '\\' => match chars.next()? {
                        'n' => '\n',
                        't' => '\t',
                        '0' => '\0',
                        other => other,
                    },
                    c => c,
                };
                Some(i64::from(u32::from(c)))
            }
            _ => None,
        }
    }
}

fn hash(value: &str) -> usize {
    let mut h = 1;
    for b in value.bytes() {
        h = (h * usize::from(b)) % TABLE_SIZE + 1;
    }
    h - 1
}

#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    buckets: Vec<Vec<SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            buckets: vec![Vec::new(); TABLE_SIZE],
        }
    }

    /// Insert `value` at GLOBAL scope or return the entry already there.
    pub fn add(&mut self, value: &str, kind: SymbolKind, line: u64) -> SymbolId {
        self.add_with_scope(value, kind, line, Scope::Global)
    }

    /// Insert `value` bound to `scope` or return the entry already there.
    ///
    /// Duplicates are not an error at this layer, redeclarations are reported by semantic analysis.
    pub fn add_with_scope(
        &mut self,
        value: &str,
        kind: SymbolKind,
        line: u64,
        scope: Scope,
    ) -> SymbolId {
        if let Some(existing) = self.get(value, scope) {
            return existing;
        }
        let id = SymbolId(self.symbols.len());
        self.symbols.push(Symbol::new(value.to_owned(), kind, line, scope));
        self.buckets[hash(value)].push(id);
        id
    }

    /// Symbol bound to exactly `scope`.
    pub fn get(&self, value: &str, scope: Scope) -> Option<SymbolId> {
        self.buckets[hash(value)]
            .iter()
            .copied()
            .find(|&id| self[id].value == value && self[id].scope == scope)
    }

    /// Like [`get`](Self::get) but a miss in a function scope falls back to GLOBAL.
    pub fn lookup(&self, value: &str, scope: Scope) -> Option<SymbolId> {
        self.get(value, scope).or_else(|| match scope {
            Scope::Global => None,
            Scope::Function(_) => self.get(value, Scope::Global),
        })
    }

    /// Rebind an existing entry in place (kind, type, scope and definition line).
    pub fn promote(
        &mut self,
        id: SymbolId,
        kind: SymbolKind,
        data_type: DataType,
        scope: Scope,
        line: u64,
    ) {
        let symbol = &mut self[id];
        symbol.kind = kind;
        symbol.data_type = data_type;
        symbol.scope = scope;
        symbol.line = line;
    }

    /// Name of a scope as used in diagnostics.
    pub fn scope_name(&self, scope: Scope) -> &str {
        match scope {
            Scope::Global => "GLOBAL",
            Scope::Function(id) => &self[id].value,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Every symbol, ordered by bucket index and then by insertion order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.buckets
            .iter()
            .flatten()
            .map(move |&id| (id, &self.symbols[id.0]))
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;
    fn index(&self, id: SymbolId) -> &Self::Output {
        &self.symbols[id.0]
    }
}

impl IndexMut<SymbolId> for SymbolTable {
    fn index_mut(&mut self, id: SymbolId) -> &mut Self::Output {
        &mut self.symbols[id.0]
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::IntLiteral => "int literal",
            Self::CharLiteral => "char literal",
            Self::StringLiteral => "string literal",
            Self::Identifier => "identifier",
            Self::Variable => "variable",
            Self::Vector => "vector",
            Self::Function => "function",
            Self::Parameter => "parameter",
            Self::Label => "label",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Undefined => "undefined",
            Self::Int => "int",
            Self::Char => "char",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            for &id in bucket {
                let symbol = &self[id];
                writeln!(
                    f,
                    "[ {index} ] : {{{}, {}, {}, {}}}",
                    symbol.value,
                    symbol.kind,
                    symbol.data_type,
                    self.scope_name(symbol.scope)
                )?;
            }
        }
        Ok(())
    }
}
