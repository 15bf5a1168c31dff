//! x86-64 code generation from three-address code.

pub mod asm_ast;
mod codegen_error;
mod gen;

use crate::symtab::SymbolTable;
use crate::tacky::TInstruction;

pub use asm_ast::*;
pub use codegen_error::{CodegenError, Result};

use gen::Generator;

/// Lower a whole program in one pass. Fails on the first instruction that can not be lowered.
pub fn codegen(instructions: &[TInstruction], table: &SymbolTable) -> Result<AsmProgram> {
    Generator::new(table).generate(instructions)
}
