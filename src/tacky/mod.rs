//! Three-address code generation.
//!
//! Expression code is produced children first: every subexpression yields its own
//! instruction list whose last result slot holds the value, and a parent splices that
//! list in front of its own instructions unless it is a bare symbol passthrough.

#[cfg(test)]
mod tacky_tests;
mod tast;

pub use tast::*;

use crate::ast::{Ast, Block, Command, Declaration, Exp, ExpKind, FunDec, VarDec, VecDec};
use crate::symtab::{DataType, SymbolId, SymbolKind, SymbolTable};

/// Serial source of temporary and label names, one counter each.
struct NameGenerator {
    name_count: u64,
    label_count: u64,
}

impl NameGenerator {
    fn new() -> Self {
        Self {
            name_count: 0,
            label_count: 0,
        }
    }

    fn get_name(&mut self) -> String {
        let c = self.name_count;
        self.name_count += 1;
        format!("tmp.{c}")
    }

    fn get_label(&mut self) -> String {
        let c = self.label_count;
        self.label_count += 1;
        format!("label.{c}")
    }
}

pub struct TackyGenerator<'a> {
    table: &'a mut SymbolTable,
    ng: NameGenerator,
}

impl<'a> TackyGenerator<'a> {
    pub fn new(table: &'a mut SymbolTable) -> Self {
        Self {
            table,
            ng: NameGenerator::new(),
        }
    }

    pub fn generate(&mut self, ast: &Ast) -> TInstructions {
        let mut instructions = Vec::new();
        for declaration in &ast.declarations {
            instructions.extend(self.emit_declaration(declaration));
        }
        instructions
    }

    /// New temporary holding a value of `data_type`.
    fn make_temp(&mut self, data_type: DataType) -> SymbolId {
        let name = self.ng.get_name();
        let id = self.table.add(&name, SymbolKind::Variable, 0);
        self.table[id].data_type = data_type;
        id
    }

    fn make_label(&mut self) -> SymbolId {
        let name = self.ng.get_label();
        self.table.add(&name, SymbolKind::Label, 0)
    }

    fn emit_declaration(&mut self, declaration: &Declaration) -> TInstructions {
        match declaration {
            Declaration::Variable(VarDec {
                name, init, divisor, ..
            }) => vec![TInstruction::Init {
                var: name.symbol,
                value: init.symbol,
                divisor: divisor.map(|d| d.symbol),
            }],
            Declaration::Vector(VecDec {
                name, size, init, ..
            }) => match init {
                None => vec![TInstruction::VectorUninit {
                    vector: name.symbol,
                    size: size.symbol,
                }],
                Some(values) => {
                    let mut instructions = vec![TInstruction::VectorInit {
                        vector: name.symbol,
                        size: size.symbol,
                    }];
                    instructions.extend(values.iter().map(|v| TInstruction::VectorInitValue {
                        vector: name.symbol,
                        value: v.symbol,
                    }));
                    instructions
                }
            },
            Declaration::Function(fun) => self.emit_function(fun),
        }
    }

    fn emit_function(&mut self, fun: &FunDec) -> TInstructions {
        let function = fun.name.symbol;
        let mut instructions = vec![TInstruction::BeginFunction(function)];
        instructions.extend(fun.params.iter().map(|p| TInstruction::Parameter {
            param: p.name.symbol,
            function,
        }));
        self.emit_block(&fun.body, &mut instructions);
        instructions.push(TInstruction::EndFunction(function));
        instructions
    }

    fn emit_block(&mut self, block: &Block, instructions: &mut TInstructions) {
        for command in &block.commands {
            self.emit_command(command, instructions);
        }
    }

    fn emit_command(&mut self, command: &Command, instructions: &mut TInstructions) {
        match command {
            Command::Assign { target, value } => {
                let value = self.emit_exp(value);
                let src = splice(instructions, value);
                instructions.push(TInstruction::Move {
                    dst: target.symbol,
                    src,
                });
            }
            Command::VectorAssign {
                target,
                index,
                value,
            } => {
                let index = self.emit_exp(index);
                let value = self.emit_exp(value);
                let index = splice(instructions, index);
                let value = splice(instructions, value);
                instructions.push(TInstruction::VectorMove {
                    vector: target.symbol,
                    index,
                    value,
                });
            }
            Command::Print(args) => {
                for arg in args {
                    let arg = self.emit_exp(arg);
                    let value = splice(instructions, arg);
                    instructions.push(TInstruction::Print(value));
                }
            }
            Command::Return(exp) => {
                let owner = exp.scope.function();
                let exp = self.emit_exp(exp);
                let value = splice(instructions, exp);
                // only reachable inside a function body
                if let Some(function) = owner {
                    instructions.push(TInstruction::Return { value, function });
                }
            }
            Command::Goto(label) => instructions.push(TInstruction::Jump(label.symbol)),
            Command::Label(label) => instructions.push(TInstruction::Label(label.symbol)),
            Command::If {
                condition,
                then,
                els: None,
            } => {
                let condition = self.emit_exp(condition);
                let end_label = self.make_label();
                let condition = splice(instructions, condition);
                instructions.push(TInstruction::JumpFalse {
                    target: end_label,
                    condition,
                });
                self.emit_command(then, instructions);
                instructions.push(TInstruction::Label(end_label));
            }
            Command::If {
                condition,
                then,
                els: Some(els),
            } => {
                let condition = self.emit_exp(condition);
                let else_label = self.make_label();
                let end_label = self.make_label();
                let condition = splice(instructions, condition);
                instructions.push(TInstruction::JumpFalse {
                    target: else_label,
                    condition,
                });
                self.emit_command(then, instructions);
                instructions.push(TInstruction::Jump(end_label));
                instructions.push(TInstruction::Label(else_label));
                self.emit_command(els, instructions);
                instructions.push(TInstruction::Label(end_label));
            }
            Command::While { condition, body } => {
                let start_label = self.make_label();
                let end_label = self.make_label();
                instructions.push(TInstruction::Label(start_label));
                let condition = self.emit_exp(condition);
                let condition = splice(instructions, condition);
                instructions.push(TInstruction::JumpFalse {
                    target: end_label,
                    condition,
                });
                self.emit_command(body, instructions);
                instructions.push(TInstruction::Jump(start_label));
                instructions.push(TInstruction::Label(end_label));
            }
            Command::Block(block) => self.emit_block(block, instructions),
        }
    }

    /// Code computing `exp`. The result of the last instruction holds the value.
    fn emit_exp(&mut self, exp: &Exp) -> TInstructions {
        match &exp.kind {
            ExpKind::Symbol(node) => vec![TInstruction::Symbol(node.symbol)],
            ExpKind::Binary(op, left, right) => {
                let left = self.emit_exp(left);
                let right = self.emit_exp(right);
                let mut instructions = Vec::new();
                let src1 = splice(&mut instructions, left);
                let src2 = splice(&mut instructions, right);
                let dst = self.make_temp(exp.get_type());
                instructions.push(TInstruction::Binary {
                    op: (*op).into(),
                    dst,
                    src1,
                    src2,
                });
                instructions
            }
            ExpKind::VectorIndex(vector, index) => {
                let index = self.emit_exp(index);
                let mut instructions = Vec::new();
                let index = splice(&mut instructions, index);
                let dst = self.make_temp(exp.get_type());
                instructions.push(TInstruction::VectorIndex {
                    dst,
                    vector: vector.symbol,
                    index,
                });
                instructions
            }
            ExpKind::Call(function, args) => {
                let args: Vec<TInstructions> = args.iter().map(|a| self.emit_exp(a)).collect();
                let mut instructions = Vec::new();
                let values: Vec<SymbolId> =
                    args.into_iter().map(|a| splice(&mut instructions, a)).collect();
                instructions.extend(values.into_iter().map(|value| TInstruction::Argument {
                    value,
                    function: function.symbol,
                }));
                let dst = self.make_temp(exp.get_type());
                instructions.push(TInstruction::Call {
                    dst,
                    function: function.symbol,
                });
                instructions
            }
            ExpKind::Read => {
                let dst = self.make_temp(DataType::Char);
                vec![TInstruction::Read(dst)]
            }
        }
    }
}

/// Append `child` unless it is a lone passthrough and return the symbol holding its value.
fn splice(instructions: &mut TInstructions, mut child: TInstructions) -> SymbolId {
    let Some(last) = child.pop() else {
        unreachable!()
    };
    let res = last.res();
    if !(last.is_passthrough() && child.is_empty()) {
        instructions.append(&mut child);
        instructions.push(last);
    }
    res
}

pub fn emit_tacky(ast: &Ast, table: &mut SymbolTable) -> TInstructions {
    TackyGenerator::new(table).generate(ast)
}
