use crate::ast::BinaryOp;
use crate::symtab::{DataType, SymbolKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SemAnalysisError>;

/// One semantic violation. Wording is informal, the variant is the category.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SemanticError {
    #[error("redeclared identifier '{name}', first declared at line {line} as {kind} of type {data_type}")]
    Redeclaration {
        name: String,
        line: u64,
        kind: SymbolKind,
        data_type: DataType,
    },
    #[error("undefined identifier '{0}'")]
    Undefined(String),
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),
    #[error("'{0}' is a {1}, not a variable")]
    NotAVariable(String, SymbolKind),
    #[error("'{0}' is a {1}, not a vector")]
    NotAVector(String, SymbolKind),
    #[error("'{0}' is a {1}, not a function")]
    NotAFunction(String, SymbolKind),
    #[error("'{0}' is a {1} and can not be used as a value")]
    NotAScalar(String, SymbolKind),
    #[error("too few arguments in call to '{function}': expected {expected}, got {got}")]
    TooFewArguments {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("too many arguments in call to '{function}': expected {expected}, got {got}")]
    TooManyArguments {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("incompatible types in {context}: expected {expected}, got {found}")]
    IncompatibleTypes {
        context: String,
        expected: DataType,
        found: DataType,
    },
    #[error("incompatible operands for '{op}': {left} and {right}")]
    IncompatibleOperands {
        op: BinaryOp,
        left: DataType,
        right: DataType,
    },
    #[error("index of vector '{0}' must be int, got {1}")]
    IndexNotInt(String, DataType),
    #[error("vector '{name}' declared with size {size} but initialized with {got} values")]
    InitializerSizeMismatch { name: String, size: usize, got: usize },
}

/// Analysis failed; the individual diagnostics have already been reported.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{errors} semantic error(s)")]
pub struct SemAnalysisError {
    pub errors: usize,
}
