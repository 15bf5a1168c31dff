use super::asm_ast::*;
use super::codegen_error::{CodegenError, Result};
use crate::symtab::{DataType, SymbolId, SymbolKind, SymbolTable};
use crate::tacky::{TBinaryOp, TInstruction};
use std::collections::HashSet;

const INT_FORMAT: &str = ".Lfmt.int";
const CHAR_FORMAT: &str = ".Lfmt.char";
const FLOAT_FORMAT: &str = ".Lfmt.float";

/// Register a value of `data_type` is computed in.
fn accumulator(data_type: DataType) -> Register {
    if data_type == DataType::Float {
        Register::XMM0
    } else {
        Register::AX
    }
}

/// Second operand register of a binary operation in `data_type`.
fn scratch(data_type: DataType) -> Register {
    if data_type == DataType::Float {
        Register::XMM1
    } else {
        Register::R10
    }
}

/// Single linear pass from three-address code to assembly.
///
/// Every symbol lives in static storage: user globals where their declaration puts them,
/// temporaries and parameters in `.comm` blocks declared at their defining instruction.
/// Values are loaded into a fixed set of registers around each operation.
pub(super) struct Generator<'a> {
    table: &'a SymbolTable,
    items: Vec<AsmItem>,
    declared: HashSet<SymbolId>,
    pending_args: Vec<SymbolId>,
    param_index: usize,
    string_count: u64,
}

impl<'a> Generator<'a> {
    pub(super) fn new(table: &'a SymbolTable) -> Self {
        Self {
            table,
            items: Vec::new(),
            declared: HashSet::new(),
            pending_args: Vec::new(),
            param_index: 0,
            string_count: 0,
        }
    }

    pub(super) fn generate(mut self, instructions: &[TInstruction]) -> Result<AsmProgram> {
        self.directive(AsmDirective::Section(Section::Rodata));
        for (label, format) in [(INT_FORMAT, "%d"), (CHAR_FORMAT, "%c"), (FLOAT_FORMAT, "%f")] {
            self.items.push(AsmItem::Label(label.into()));
            self.directive(AsmDirective::String(format.into()));
        }
        for instruction in instructions {
            self.instruction(instruction)?;
        }
        Ok(AsmProgram { items: self.items })
    }

    fn push(&mut self, instruction: AsmInstruction) {
        self.items.push(AsmItem::Instruction(instruction));
    }

    fn directive(&mut self, directive: AsmDirective) {
        self.items.push(AsmItem::Directive(directive));
    }

    fn data_type(&self, id: SymbolId) -> DataType {
        self.table[id].data_type
    }

    fn asm_type(&self, id: SymbolId) -> Result<AsmType> {
        let data_type = self.data_type(id);
        AsmType::from_data_type(data_type)
            .ok_or_else(|| CodegenError::NotLoadable(self.table[id].value.clone(), data_type))
    }

    /// Assembly name of a symbol's storage or label.
    fn storage_name(&self, id: SymbolId) -> String {
        let symbol = &self.table[id];
        match (symbol.kind, symbol.scope.function()) {
            (SymbolKind::Parameter | SymbolKind::Label, Some(f)) => {
                format!("{}.{}", self.table[f].value, symbol.value)
            }
            _ => symbol.value.clone(),
        }
    }

    fn end_label(&self, function: SymbolId) -> String {
        format!("{}.return", self.table[function].value)
    }

    fn literal(&self, id: SymbolId) -> Result<i64> {
        let symbol = &self.table[id];
        symbol
            .literal_value()
            .ok_or_else(|| CodegenError::NotLoadable(symbol.value.clone(), symbol.data_type))
    }

    fn operand(&self, id: SymbolId) -> Result<Operand> {
        let symbol = &self.table[id];
        match symbol.kind {
            SymbolKind::IntLiteral | SymbolKind::CharLiteral => Ok(Operand::Imm(self.literal(id)?)),
            SymbolKind::StringLiteral => Err(CodegenError::NotLoadable(
                symbol.value.clone(),
                symbol.data_type,
            )),
            _ => Ok(Operand::Data(self.storage_name(id))),
        }
    }

    /// Reserve `.comm` storage for a temporary or parameter, once.
    fn declare_storage(&mut self, id: SymbolId) {
        if self.declared.insert(id) {
            let size = self.data_type(id).size();
            self.directive(AsmDirective::Comm {
                name: self.storage_name(id),
                size,
                alignment: size,
            });
        }
    }

    /// Load `src` into `dst` converted to `to`.
    fn load(&mut self, src: SymbolId, to: DataType, dst: Register) -> Result<()> {
        use AsmInstruction as AI;
        let from = self.data_type(src);
        let src = self.operand(src)?;
        let dst = Operand::Reg(dst);
        let r11 = Operand::Reg(Register::R11);
        match (from, to) {
            (DataType::Int, DataType::Int | DataType::Char) => {
                self.push(AI::Mov(AsmType::Longword, src, dst));
            }
            (DataType::Char, DataType::Char) | (DataType::Bool, DataType::Bool) => {
                self.push(AI::Mov(AsmType::Byte, src, dst));
            }
            (DataType::Float, DataType::Float) => self.push(AI::Mov(AsmType::Single, src, dst)),
            (DataType::Char, DataType::Int) if src.is_imm() => {
                self.push(AI::Mov(AsmType::Longword, src, dst));
            }
            (DataType::Char, DataType::Int) => self.push(AI::Movsx(src, dst)),
            (DataType::Int, DataType::Float) if src.is_imm() => {
                self.push(AI::Mov(AsmType::Longword, src, r11.clone()));
                self.push(AI::Cvtsi2ss(r11, dst));
            }
            (DataType::Int, DataType::Float) => self.push(AI::Cvtsi2ss(src, dst)),
            (DataType::Char, DataType::Float) => {
                if src.is_imm() {
                    self.push(AI::Mov(AsmType::Longword, src, r11.clone()));
                } else {
                    self.push(AI::Movsx(src, r11.clone()));
                }
                self.push(AI::Cvtsi2ss(r11, dst));
            }
            (DataType::Float, DataType::Int | DataType::Char) => self.push(AI::Cvttss2si(src, dst)),
            (from, to) => return Err(CodegenError::UnsupportedCoercion { from, to }),
        }
        Ok(())
    }

    /// Load `src` converted to `to` into the accumulator and return it.
    fn load_value(&mut self, src: SymbolId, to: DataType) -> Result<Register> {
        let reg = accumulator(to);
        self.load(src, to, reg)?;
        Ok(reg)
    }

    fn store(&mut self, src: Register, dst: SymbolId) -> Result<()> {
        let t = self.asm_type(dst)?;
        let name = self.storage_name(dst);
        self.push(AsmInstruction::Mov(t, Operand::Reg(src), Operand::Data(name)));
        Ok(())
    }

    fn begin_data(&mut self, id: SymbolId) {
        self.directive(AsmDirective::Section(Section::Data));
        self.directive(AsmDirective::Align(self.data_type(id).size()));
        self.items.push(AsmItem::Label(self.storage_name(id)));
    }

    #[allow(clippy::cast_precision_loss)]
    fn data_value(&mut self, data_type: DataType, value: i64, divisor: Option<i64>) -> Result<()> {
        let directive = match data_type {
            DataType::Int => AsmDirective::Long(value),
            DataType::Char | DataType::Bool => AsmDirective::Byte(value),
            DataType::Float => {
                let float = value as f32 / divisor.map_or(1.0, |d| d as f32);
                AsmDirective::Long(i64::from(float.to_bits()))
            }
            DataType::String | DataType::Undefined => {
                return Err(CodegenError::UnsupportedCoercion {
                    from: DataType::Int,
                    to: data_type,
                })
            }
        };
        self.directive(directive);
        Ok(())
    }

    fn vector_size(&self, vector: SymbolId, size: SymbolId) -> Result<u64> {
        self.literal(size)
            .ok()
            .and_then(|n| u64::try_from(n).ok())
            .ok_or_else(|| CodegenError::BadVectorSize(self.table[vector].value.clone()))
    }

    fn instruction(&mut self, instruction: &TInstruction) -> Result<()> {
        use AsmInstruction as AI;
        use TInstruction as TI;
        match *instruction {
            TI::Symbol(_) => {}
            TI::Init {
                var,
                value,
                divisor,
            } => {
                let value = self.literal(value)?;
                let divisor = divisor.map(|d| self.literal(d)).transpose()?;
                self.begin_data(var);
                self.data_value(self.data_type(var), value, divisor)?;
            }
            TI::VectorInit { vector, size } => {
                self.vector_size(vector, size)?;
                self.begin_data(vector);
            }
            TI::VectorInitValue { vector, value } => {
                let value = self.literal(value)?;
                self.data_value(self.data_type(vector), value, None)?;
            }
            TI::VectorUninit { vector, size } => {
                let length = self.vector_size(vector, size)?;
                let element = self.data_type(vector).size();
                self.directive(AsmDirective::Comm {
                    name: self.storage_name(vector),
                    size: length * element,
                    alignment: element,
                });
            }
            TI::Binary {
                op,
                dst,
                src1,
                src2,
            } => self.binary(op, dst, src1, src2)?,
            TI::Move { dst, src } => {
                let reg = self.load_value(src, self.data_type(dst))?;
                self.store(reg, dst)?;
            }
            TI::VectorMove {
                vector,
                index,
                value,
            } => {
                let element = self.data_type(vector);
                let t = self.asm_type(vector)?;
                self.load(index, DataType::Int, Register::CX)?;
                self.push(AI::Lea(
                    Operand::Data(self.storage_name(vector)),
                    Register::DX.into(),
                ));
                let reg = self.load_value(value, element)?;
                self.push(AI::Mov(
                    t,
                    reg.into(),
                    Operand::Indexed {
                        base: Register::DX,
                        index: Register::CX,
                        scale: element.size(),
                    },
                ));
            }
            TI::VectorIndex { dst, vector, index } => {
                let element = self.data_type(vector);
                let t = self.asm_type(vector)?;
                self.load(index, DataType::Int, Register::CX)?;
                self.push(AI::Lea(
                    Operand::Data(self.storage_name(vector)),
                    Register::DX.into(),
                ));
                let reg = accumulator(element);
                self.push(AI::Mov(
                    t,
                    Operand::Indexed {
                        base: Register::DX,
                        index: Register::CX,
                        scale: element.size(),
                    },
                    reg.into(),
                ));
                self.declare_storage(dst);
                self.store(reg, dst)?;
            }
            TI::BeginFunction(function) => {
                let name = self.storage_name(function);
                self.param_index = 0;
                self.directive(AsmDirective::Section(Section::Text));
                self.directive(AsmDirective::Globl(name.clone()));
                self.items.push(AsmItem::Label(name));
                self.push(AI::Push(Register::BP.into()));
                self.push(AI::Mov(
                    AsmType::Quadword,
                    Register::SP.into(),
                    Register::BP.into(),
                ));
                self.push(AI::Binary(
                    AsmType::Quadword,
                    AsmBinaryOp::And,
                    Operand::Imm(-16),
                    Register::SP.into(),
                ));
            }
            TI::Parameter { param, function } => {
                // pushed in source order, so the last parameter sits right above the return address
                let count = self.table[function].parameters.len();
                let offset = 16 + 8 * count.saturating_sub(self.param_index + 1) as i64;
                self.param_index += 1;
                let t = self.asm_type(param)?;
                let reg = accumulator(self.data_type(param));
                self.declare_storage(param);
                self.push(AI::Mov(t, Operand::Stack(offset), reg.into()));
                self.store(reg, param)?;
            }
            TI::EndFunction(function) => {
                self.push(AI::Mov(
                    AsmType::Longword,
                    Operand::Imm(0),
                    Register::AX.into(),
                ));
                self.push(AI::Label(self.end_label(function)));
                self.push(AI::Ret);
            }
            TI::Return { value, function } => {
                let reg = self.load_value(value, self.data_type(function))?;
                if reg == Register::XMM0 {
                    self.push(AI::Movd(reg.into(), Register::AX.into()));
                }
                self.push(AI::Jmp(self.end_label(function)));
            }
            TI::Argument { value, .. } => self.pending_args.push(value),
            TI::Call { dst, function } => self.call(dst, function)?,
            TI::JumpFalse { target, condition } => {
                self.load(condition, DataType::Bool, Register::AX)?;
                self.push(AI::Cmp(
                    AsmType::Byte,
                    Operand::Imm(0),
                    Register::AX.into(),
                ));
                self.push(AI::JmpCC(Condition::E, self.storage_name(target)));
            }
            TI::Jump(target) => self.push(AI::Jmp(self.storage_name(target))),
            TI::Label(label) => self.push(AI::Label(self.storage_name(label))),
            TI::Print(value) => self.print(value)?,
            TI::Read(dst) => {
                self.push(AI::Call("getchar".into()));
                self.declare_storage(dst);
                self.store(Register::AX, dst)?;
            }
        }
        Ok(())
    }

    fn binary(&mut self, op: TBinaryOp, dst: SymbolId, src1: SymbolId, src2: SymbolId) -> Result<()> {
        use AsmInstruction as AI;
        let is_float = |t: DataType| t == DataType::Float;
        self.declare_storage(dst);
        if op.is_comp() {
            let family = if is_float(self.data_type(src1)) || is_float(self.data_type(src2)) {
                DataType::Float
            } else {
                DataType::Int
            };
            let (left, right) = (accumulator(family), scratch(family));
            self.load(src1, family, left)?;
            self.load(src2, family, right)?;
            let condition = Condition::from_comparison(op)
                .ok_or(CodegenError::UnsupportedOperator(op.name()))?;
            if is_float(family) {
                self.push(AI::Cmp(AsmType::Single, right.into(), left.into()));
                self.push(AI::SetCC(condition.to_unsigned(), Register::AX.into()));
            } else {
                self.push(AI::Cmp(AsmType::Longword, right.into(), left.into()));
                self.push(AI::SetCC(condition, Register::AX.into()));
            }
            return self.store(Register::AX, dst);
        }

        let family = if is_float(self.data_type(dst)) {
            DataType::Float
        } else {
            DataType::Int
        };
        let asm_op = AsmBinaryOp::from_arithmetic(op).ok_or(CodegenError::UnsupportedOperator(op.name()))?;
        let (left, right) = (accumulator(family), scratch(family));
        self.load(src1, family, left)?;
        self.load(src2, family, right)?;
        match (is_float(family), op) {
            (false, TBinaryOp::Divide) => {
                self.push(AI::Cdq);
                self.push(AI::Idiv(AsmType::Longword, right.into()));
            }
            (false, _) => self.push(AI::Binary(
                AsmType::Longword,
                asm_op,
                right.into(),
                left.into(),
            )),
            (true, _) => self.push(AI::Binary(
                AsmType::Single,
                asm_op,
                right.into(),
                left.into(),
            )),
        }
        self.store(left, dst)
    }

    /// Push buffered arguments converted to the callee's parameter types and call it.
    fn call(&mut self, dst: SymbolId, function: SymbolId) -> Result<()> {
        use AsmInstruction as AI;
        let table = self.table;
        let args = std::mem::take(&mut self.pending_args);
        let params = &table[function].parameters;
        let padding = args.len() % 2 == 1;
        if padding {
            self.push(AI::Binary(
                AsmType::Quadword,
                AsmBinaryOp::Sub,
                Operand::Imm(8),
                Register::SP.into(),
            ));
        }
        for (i, &arg) in args.iter().enumerate() {
            let to = params.get(i).map_or(self.data_type(arg), |&p| self.data_type(p));
            let reg = self.load_value(arg, to)?;
            if reg == Register::XMM0 {
                self.push(AI::Movd(reg.into(), Register::AX.into()));
            }
            self.push(AI::Push(Register::AX.into()));
        }
        self.push(AI::Call(self.storage_name(function)));
        let pushed = args.len() + usize::from(padding);
        if pushed > 0 {
            self.push(AI::Binary(
                AsmType::Quadword,
                AsmBinaryOp::Add,
                Operand::Imm(8 * pushed as i64),
                Register::SP.into(),
            ));
        }

        // float results come back as raw bits in %eax
        self.declare_storage(dst);
        let t = match self.asm_type(dst)? {
            AsmType::Single => AsmType::Longword,
            t => t,
        };
        let name = self.storage_name(dst);
        self.push(AI::Mov(t, Register::AX.into(), Operand::Data(name)));
        Ok(())
    }

    fn print(&mut self, value: SymbolId) -> Result<()> {
        use AsmInstruction as AI;
        let table = self.table;
        let symbol = &table[value];
        let di = Operand::Reg(Register::DI);
        if symbol.kind == SymbolKind::StringLiteral {
            let text = symbol
                .value
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(symbol.value.as_str())
                .replace('%', "%%");
            let label = format!(".Lstr.{}", self.string_count);
            self.string_count += 1;
            self.directive(AsmDirective::Section(Section::Rodata));
            self.items.push(AsmItem::Label(label.clone()));
            self.directive(AsmDirective::String(text));
            self.directive(AsmDirective::Section(Section::Text));
            self.push(AI::Lea(Operand::Data(label), di));
            self.push(AI::Mov(AsmType::Longword, Operand::Imm(0), Register::AX.into()));
            self.push(AI::Call("printf".into()));
            return Ok(());
        }

        let (format, varargs) = match symbol.data_type {
            DataType::Int => {
                self.load(value, DataType::Int, Register::SI)?;
                (INT_FORMAT, 0)
            }
            DataType::Char => {
                self.load(value, DataType::Int, Register::SI)?;
                (CHAR_FORMAT, 0)
            }
            DataType::Bool => {
                let src = self.operand(value)?;
                self.push(AI::MovZX(src, Register::SI.into()));
                (INT_FORMAT, 0)
            }
            DataType::Float => {
                self.load(value, DataType::Float, Register::XMM0)?;
                self.push(AI::Cvtss2sd(Register::XMM0.into(), Register::XMM0.into()));
                (FLOAT_FORMAT, 1)
            }
            data_type @ (DataType::String | DataType::Undefined) => {
                return Err(CodegenError::NotLoadable(symbol.value.clone(), data_type))
            }
        };
        self.push(AI::Lea(Operand::Data(format.into()), di));
        self.push(AI::Mov(
            AsmType::Longword,
            Operand::Imm(varargs),
            Register::AX.into(),
        ));
        self.push(AI::Call("printf".into()));
        Ok(())
    }
}
