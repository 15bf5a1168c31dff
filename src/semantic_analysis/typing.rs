use crate::ast::SymbolNode;
use crate::symtab::{DataType, SymbolTable};

/// Type of an arithmetic result: undefined wins, then float, then char when both are char,
/// otherwise int.
pub fn resulting_data_type(left: DataType, right: DataType) -> DataType {
    match (left, right) {
        (DataType::Undefined, _) | (_, DataType::Undefined) => DataType::Undefined,
        (DataType::Float, _) | (_, DataType::Float) => DataType::Float,
        (DataType::Char, DataType::Char) => DataType::Char,
        _ => DataType::Int,
    }
}

/// Whether a value of one type may flow into a slot of the other.
///
/// Never for undefined or string, and bool only pairs with bool.
pub fn are_compatible(left: DataType, right: DataType) -> bool {
    match (left, right) {
        (DataType::Undefined | DataType::String, _) | (_, DataType::Undefined | DataType::String) => {
            false
        }
        (DataType::Bool, other) | (other, DataType::Bool) => other == DataType::Bool,
        _ => true,
    }
}

/// Give a literal leaf's symbol the type its text implies, if it has none yet.
pub fn set_literal_type(table: &mut SymbolTable, leaf: &SymbolNode) {
    let symbol = &mut table[leaf.symbol];
    if symbol.data_type == DataType::Undefined {
        if let Some(data_type) = symbol.literal_type() {
            symbol.data_type = data_type;
        }
    }
}
