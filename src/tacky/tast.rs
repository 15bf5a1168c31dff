use crate::ast::BinaryOp;
use crate::symtab::{SymbolId, SymbolTable};
use std::fmt;

pub type TInstructions = Vec<TInstruction>;

/// Three-address instruction. Every operand is a symbol of the table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TInstruction {
    /// Passthrough of an already resolved symbol, never spliced into a parent list
    Symbol(SymbolId),
    Init {
        var: SymbolId,
        value: SymbolId,
        divisor: Option<SymbolId>,
    },
    VectorInit {
        vector: SymbolId,
        size: SymbolId,
    },
    VectorUninit {
        vector: SymbolId,
        size: SymbolId,
    },
    VectorInitValue {
        vector: SymbolId,
        value: SymbolId,
    },
    Binary {
        op: TBinaryOp,
        dst: SymbolId,
        src1: SymbolId,
        src2: SymbolId,
    },
    Move {
        dst: SymbolId,
        src: SymbolId,
    },
    VectorMove {
        vector: SymbolId,
        index: SymbolId,
        value: SymbolId,
    },
    VectorIndex {
        dst: SymbolId,
        vector: SymbolId,
        index: SymbolId,
    },
    BeginFunction(SymbolId),
    EndFunction(SymbolId),
    JumpFalse {
        target: SymbolId,
        condition: SymbolId,
    },
    Jump(SymbolId),
    Call {
        dst: SymbolId,
        function: SymbolId,
    },
    Argument {
        value: SymbolId,
        function: SymbolId,
    },
    Parameter {
        param: SymbolId,
        function: SymbolId,
    },
    Return {
        value: SymbolId,
        function: SymbolId,
    },
    Print(SymbolId),
    Read(SymbolId),
    Label(SymbolId),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TBinaryOp {
    Add,
    Substract,
    Multiply,
    Divide,
    IsEqual,
    IsNotEqual,
    IsGreaterThan,
    IsGreaterOrEqual,
    IsLessThan,
    IsLessOrEqual,
}

impl TBinaryOp {
    pub fn is_comp(self) -> bool {
        matches!(
            self,
            Self::IsEqual
                | Self::IsNotEqual
                | Self::IsLessThan
                | Self::IsLessOrEqual
                | Self::IsGreaterThan
                | Self::IsGreaterOrEqual
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "sum",
            Self::Substract => "sub",
            Self::Multiply => "mul",
            Self::Divide => "div",
            Self::IsEqual => "eq",
            Self::IsNotEqual => "dif",
            Self::IsGreaterThan => "gt",
            Self::IsGreaterOrEqual => "ge",
            Self::IsLessThan => "lt",
            Self::IsLessOrEqual => "le",
        }
    }
}

impl From<BinaryOp> for TBinaryOp {
    fn from(value: BinaryOp) -> Self {
        match value {
            BinaryOp::Add => Self::Add,
            BinaryOp::Sub => Self::Substract,
            BinaryOp::Mul => Self::Multiply,
            BinaryOp::Div => Self::Divide,
            BinaryOp::IsEqual => Self::IsEqual,
            BinaryOp::IsNotEqual => Self::IsNotEqual,
            BinaryOp::GreaterThan => Self::IsGreaterThan,
            BinaryOp::GreaterOrEqual => Self::IsGreaterOrEqual,
            BinaryOp::LessThan => Self::IsLessThan,
            BinaryOp::LessOrEqual => Self::IsLessOrEqual,
        }
    }
}

impl TInstruction {
    pub fn opcode(&self) -> &'static str {
        match self {
            Self::Symbol(_) => "symbol",
            Self::Init { .. } => "init",
            Self::VectorInit { .. } => "vector_init",
            Self::VectorUninit { .. } => "vector_uninit",
            Self::VectorInitValue { .. } => "vector_init_value",
            Self::Binary { op, .. } => op.name(),
            Self::Move { .. } => "move",
            Self::VectorMove { .. } => "vector_move",
            Self::VectorIndex { .. } => "vector_index",
            Self::BeginFunction(_) => "begin_function",
            Self::EndFunction(_) => "end_function",
            Self::JumpFalse { .. } => "jump_false",
            Self::Jump(_) => "jump",
            Self::Call { .. } => "call",
            Self::Argument { .. } => "arg",
            Self::Parameter { .. } => "param",
            Self::Return { .. } => "return",
            Self::Print(_) => "print",
            Self::Read(_) => "read",
            Self::Label(_) => "label",
        }
    }

    /// Result slot. For expression code this is where the value ends up.
    pub fn res(&self) -> SymbolId {
        match *self {
            Self::Symbol(id)
            | Self::BeginFunction(id)
            | Self::EndFunction(id)
            | Self::Jump(id)
            | Self::Print(id)
            | Self::Read(id)
            | Self::Label(id) => id,
            Self::Init { var, .. } => var,
            Self::VectorInit { vector, .. }
            | Self::VectorUninit { vector, .. }
            | Self::VectorInitValue { vector, .. }
            | Self::VectorMove { vector, .. } => vector,
            Self::Binary { dst, .. }
            | Self::Move { dst, .. }
            | Self::VectorIndex { dst, .. }
            | Self::Call { dst, .. } => dst,
            Self::JumpFalse { target, .. } => target,
            Self::Argument { value, .. } | Self::Return { value, .. } => value,
            Self::Parameter { param, .. } => param,
        }
    }

    /// Source slots, `None` where the opcode leaves them unused.
    pub fn operands(&self) -> (Option<SymbolId>, Option<SymbolId>) {
        match *self {
            Self::Symbol(_)
            | Self::BeginFunction(_)
            | Self::EndFunction(_)
            | Self::Jump(_)
            | Self::Print(_)
            | Self::Read(_)
            | Self::Label(_) => (None, None),
            Self::Init { value, divisor, .. } => (Some(value), divisor),
            Self::VectorInit { size, .. } | Self::VectorUninit { size, .. } => (Some(size), None),
            Self::VectorInitValue { value, .. } => (Some(value), None),
            Self::Binary { src1, src2, .. } => (Some(src1), Some(src2)),
            Self::Move { src, .. } => (Some(src), None),
            Self::VectorMove { index, value, .. } => (Some(index), Some(value)),
            Self::VectorIndex { vector, index, .. } => (Some(vector), Some(index)),
            Self::JumpFalse { condition, .. } => (Some(condition), None),
            Self::Call { function, .. }
            | Self::Argument { function, .. }
            | Self::Parameter { function, .. }
            | Self::Return { function, .. } => (Some(function), None),
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }
}

/// Printable listing of an instruction sequence, one `TAC(opcode, res, op1, op2)` per line.
pub struct Listing<'a> {
    instructions: &'a [TInstruction],
    table: &'a SymbolTable,
}

impl<'a> Listing<'a> {
    pub fn new(instructions: &'a [TInstruction], table: &'a SymbolTable) -> Self {
        Self {
            instructions,
            table,
        }
    }

    fn name(&self, id: Option<SymbolId>) -> &str {
        id.map_or("NOP", |id| self.table[id].value.as_str())
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for instruction in self.instructions {
            let (op1, op2) = instruction.operands();
            writeln!(
                f,
                "TAC(tac_{}, {}, {}, {})",
                instruction.opcode(),
                self.name(Some(instruction.res())),
                self.name(op1),
                self.name(op2)
            )?;
        }
        Ok(())
    }
}
