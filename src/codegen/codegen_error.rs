use crate::symtab::DataType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodegenError>;

/// Lowering failures. Programs that passed semantic analysis never produce them.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CodegenError {
    #[error("no conversion from {from} to {to}")]
    UnsupportedCoercion { from: DataType, to: DataType },
    #[error("'{0}' of type {1} can not be loaded")]
    NotLoadable(String, DataType),
    #[error("operator 'tac_{0}' has no lowering in this position")]
    UnsupportedOperator(&'static str),
    #[error("vector '{0}' has no literal size")]
    BadVectorSize(String),
}
