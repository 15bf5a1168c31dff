use crate::symtab::DataType;
use crate::tacky::TBinaryOp;

/// Flat assembly listing, emitted in order.
#[derive(Debug, Default)]
pub struct AsmProgram {
    pub items: Vec<AsmItem>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AsmItem {
    Directive(AsmDirective),
    /// Global label, e.g. a function entry or a variable
    Label(String),
    Instruction(AsmInstruction),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Section {
    Text,
    Data,
    Rodata,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AsmDirective {
    Section(Section),
    Globl(String),
    Align(u64),
    Comm {
        name: String,
        size: u64,
        alignment: u64,
    },
    Byte(i64),
    Long(i64),
    String(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AsmType {
    Byte,
    Longword,
    Quadword,
    Single,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AsmInstruction {
    Mov(AsmType, Operand, Operand),
    /// Sign extend a byte into a longword
    Movsx(Operand, Operand),
    /// Zero extend a byte into a longword
    MovZX(Operand, Operand),
    /// Raw bits of a single precision register into a longword register
    Movd(Operand, Operand),
    Lea(Operand, Operand),
    Binary(AsmType, AsmBinaryOp, Operand, Operand),
    Cmp(AsmType, Operand, Operand),
    Cdq,
    Idiv(AsmType, Operand),
    SetCC(Condition, Operand),
    Jmp(String),
    JmpCC(Condition, String),
    /// Local label, displayed with the `.L` prefix
    Label(String),
    Cvtsi2ss(Operand, Operand),
    Cvttss2si(Operand, Operand),
    Cvtss2sd(Operand, Operand),
    Push(Operand),
    Call(String),
    Ret,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AsmBinaryOp {
    Add,
    Sub,
    Imul,
    And,
    DivSingle,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Condition {
    E,
    NE,
    //Signed:
    G,
    GE,
    L,
    LE,
    //Unsigned, used after float compares:
    A,
    AE,
    B,
    BE,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    Imm(i64),
    Reg(Register),
    /// `offset(%rbp)`
    Stack(i64),
    /// `name(%rip)`
    Data(String),
    /// `(base,index,scale)` with quadword registers
    Indexed {
        base: Register,
        index: Register,
        scale: u64,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Register {
    AX,
    CX,
    DX,
    DI,
    SI,
    R10,
    R11,
    SP,
    BP,
    XMM0,
    XMM1,
}

impl AsmType {
    /// Storage type of a value of `data_type`, `None` for types that never live in memory.
    pub fn from_data_type(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Int => Some(Self::Longword),
            DataType::Char | DataType::Bool => Some(Self::Byte),
            DataType::Float => Some(Self::Single),
            DataType::String | DataType::Undefined => None,
        }
    }
}

impl Condition {
    pub fn to_unsigned(self) -> Self {
        match self {
            Self::LE => Self::BE,
            Self::L => Self::B,
            Self::GE => Self::AE,
            Self::G => Self::A,
            _ => self,
        }
    }
}

impl Operand {
    pub fn is_imm(&self) -> bool {
        matches!(self, Self::Imm(_))
    }
}

impl From<Register> for Operand {
    fn from(value: Register) -> Self {
        Self::Reg(value)
    }
}

impl Condition {
    /// Signed condition of a comparison operator, `None` for arithmetic.
    pub fn from_comparison(op: TBinaryOp) -> Option<Self> {
        match op {
            TBinaryOp::IsEqual => Some(Self::E),
            TBinaryOp::IsNotEqual => Some(Self::NE),
            TBinaryOp::IsGreaterThan => Some(Self::G),
            TBinaryOp::IsGreaterOrEqual => Some(Self::GE),
            TBinaryOp::IsLessThan => Some(Self::L),
            TBinaryOp::IsLessOrEqual => Some(Self::LE),
            _ => None,
        }
    }
}

impl AsmBinaryOp {
    /// `None` for comparisons. Division maps to its single precision form, integer
    /// division goes through `idiv` instead.
    pub fn from_arithmetic(op: TBinaryOp) -> Option<Self> {
        match op {
            TBinaryOp::Add => Some(Self::Add),
            TBinaryOp::Substract => Some(Self::Sub),
            TBinaryOp::Multiply => Some(Self::Imul),
            TBinaryOp::Divide => Some(Self::DivSingle),
            _ => None,
        }
    }
}
