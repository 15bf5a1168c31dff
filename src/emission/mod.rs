//! Code emission using [Display]
//!
//! Implements [Display] for [AsmProgram](crate::codegen::AsmProgram), so a program is emitted with
//! [to_string] or as a formatting arg in any formatting context (e.g. [format!], [write!]).
//! The text is AT&T syntax for the GNU assembler on x86-64 Linux.
//!
//! [Display]: https://doc.rust-lang.org/std/fmt/trait.Display.html
//! [to_string]: https://doc.rust-lang.org/std/string/trait.ToString.html#tymethod.to_string
//! [format!]: https://doc.rust-lang.org/std/macro.format.html
//! [write!]: https://doc.rust-lang.org/std/macro.write.html

#[cfg(test)]
mod emission_tests;

use crate::codegen::*;

use std::fmt;

impl fmt::Display for AsmBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Imul => write!(f, "imul"),
            Self::And => write!(f, "and"),
            Self::DivSingle => write!(f, "div"),
        }
    }
}

impl fmt::Display for AsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "b"),
            Self::Longword => write!(f, "l"),
            Self::Quadword => write!(f, "q"),
            Self::Single => write!(f, "ss"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::NE => write!(f, "ne"),
            Self::L => write!(f, "l"),
            Self::LE => write!(f, "le"),
            Self::G => write!(f, "g"),
            Self::GE => write!(f, "ge"),
            Self::A => write!(f, "a"),
            Self::AE => write!(f, "ae"),
            Self::B => write!(f, "b"),
            Self::BE => write!(f, "be"),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text => write!(f, ".text"),
            Self::Data => write!(f, ".data"),
            Self::Rodata => write!(f, ".section .rodata"),
        }
    }
}

fn display_quadword_reg(r: Register) -> &'static str {
    match r {
        Register::AX => "%rax",
        Register::CX => "%rcx",
        Register::DX => "%rdx",
        Register::DI => "%rdi",
        Register::SI => "%rsi",
        Register::R10 => "%r10",
        Register::R11 => "%r11",
        Register::SP => "%rsp",
        Register::BP => "%rbp",
        _ => display_xmm(r),
    }
}

fn display_longword_reg(r: Register) -> &'static str {
    match r {
        Register::AX => "%eax",
        Register::CX => "%ecx",
        Register::DX => "%edx",
        Register::DI => "%edi",
        Register::SI => "%esi",
        Register::R10 => "%r10d",
        Register::R11 => "%r11d",
        Register::SP => "%esp",
        Register::BP => "%ebp",
        _ => display_xmm(r),
    }
}

fn display_byte_reg(r: Register) -> &'static str {
    match r {
        Register::AX => "%al",
        Register::CX => "%cl",
        Register::DX => "%dl",
        Register::DI => "%dil",
        Register::SI => "%sil",
        Register::R10 => "%r10b",
        Register::R11 => "%r11b",
        Register::SP => "%spl",
        Register::BP => "%bpl",
        _ => display_xmm(r),
    }
}

fn display_xmm(r: Register) -> &'static str {
    match r {
        Register::XMM0 => "%xmm0",
        Register::XMM1 => "%xmm1",
        _ => {
            panic!("internal error: attempt to display non floating register {r:?} in floating operation")
        }
    }
}

fn display_reg(r: Register, t: AsmType) -> &'static str {
    match t {
        AsmType::Byte => display_byte_reg(r),
        AsmType::Longword => display_longword_reg(r),
        AsmType::Quadword => display_quadword_reg(r),
        AsmType::Single => display_xmm(r),
    }
}

fn display_operand(op: &Operand, t: AsmType) -> String {
    match op {
        Operand::Data(name) => format!("{name}(%rip)"),
        Operand::Reg(r) => display_reg(*r, t).to_string(),
        Operand::Imm(i) => format!("${i}"),
        Operand::Stack(i) => format!("{i}(%rbp)"),
        Operand::Indexed { base, index, scale } => format!(
            "({},{},{scale})",
            display_quadword_reg(*base),
            display_quadword_reg(*index)
        ),
    }
}

impl fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Mov(t, src, dst) => {
                let src_str = display_operand(src, *t);
                let dst_str = display_operand(dst, *t);
                write!(f, "mov{t} {src_str}, {dst_str}")
            }
            Self::Movsx(src, dst) => {
                let src_str = display_operand(src, AsmType::Byte);
                let dst_str = display_operand(dst, AsmType::Longword);
                write!(f, "movsbl {src_str}, {dst_str}")
            }
            Self::MovZX(src, dst) => {
                let src_str = display_operand(src, AsmType::Byte);
                let dst_str = display_operand(dst, AsmType::Longword);
                write!(f, "movzbl {src_str}, {dst_str}")
            }
            Self::Movd(src, dst) => {
                let src_str = display_operand(src, AsmType::Single);
                let dst_str = display_operand(dst, AsmType::Longword);
                write!(f, "movd {src_str}, {dst_str}")
            }
            Self::Lea(src, dst) => {
                let src_str = display_operand(src, AsmType::Quadword);
                let dst_str = display_operand(dst, AsmType::Quadword);
                write!(f, "leaq {src_str}, {dst_str}")
            }
            Self::Binary(AsmType::Single, AsmBinaryOp::Imul, src, dst) => {
                let src_str = display_operand(src, AsmType::Single);
                let dst_str = display_operand(dst, AsmType::Single);
                write!(f, "mulss {src_str}, {dst_str}")
            }
            Self::Binary(t, op, src, dst) => {
                let src_str = display_operand(src, *t);
                let dst_str = display_operand(dst, *t);
                write!(f, "{op}{t} {src_str}, {dst_str}")
            }
            Self::Cmp(AsmType::Single, src, dst) => {
                let src_str = display_operand(src, AsmType::Single);
                let dst_str = display_operand(dst, AsmType::Single);
                write!(f, "ucomiss {src_str}, {dst_str}")
            }
            Self::Cmp(t, src, dst) => {
                let src_str = display_operand(src, *t);
                let dst_str = display_operand(dst, *t);
                write!(f, "cmp{t} {src_str}, {dst_str}")
            }
            Self::Cdq => write!(f, "cdq"),
            Self::Idiv(t, op) => {
                let op_str = display_operand(op, *t);
                write!(f, "idiv{t} {op_str}")
            }
            Self::SetCC(cond_code, operand) => {
                let operand_str = display_operand(operand, AsmType::Byte);
                write!(f, "set{cond_code} {operand_str}")
            }
            Self::Jmp(label) => write!(f, "jmp .L{label}"),
            Self::JmpCC(condition, label) => write!(f, "j{condition} .L{label}"),
            Self::Label(label) => write!(f, ".L{label}:"),
            Self::Cvtsi2ss(src, dst) => {
                let src_str = display_operand(src, AsmType::Longword);
                let dst_str = display_operand(dst, AsmType::Single);
                write!(f, "cvtsi2ssl {src_str}, {dst_str}")
            }
            Self::Cvttss2si(src, dst) => {
                let src_str = display_operand(src, AsmType::Single);
                let dst_str = display_operand(dst, AsmType::Longword);
                write!(f, "cvttss2si {src_str}, {dst_str}")
            }
            Self::Cvtss2sd(src, dst) => {
                let src_str = display_operand(src, AsmType::Single);
                let dst_str = display_operand(dst, AsmType::Single);
                write!(f, "cvtss2sd {src_str}, {dst_str}")
            }
            Self::Push(op) => write!(f, "pushq {}", display_operand(op, AsmType::Quadword)),
            Self::Call(name) => write!(f, "call {name}"),
            Self::Ret => write!(f, "movq %rbp, %rsp\n\tpopq %rbp\n\tret"),
        }
    }
}

impl fmt::Display for AsmDirective {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Section(section) => write!(f, "{section}"),
            Self::Globl(name) => write!(f, ".globl {name}"),
            Self::Align(alignment) => write!(f, ".align {alignment}"),
            Self::Comm {
                name,
                size,
                alignment,
            } => write!(f, ".comm {name},{size},{alignment}"),
            Self::Byte(value) => write!(f, ".byte {value}"),
            Self::Long(value) => write!(f, ".long {value}"),
            Self::String(text) => write!(f, ".string \"{text}\""),
        }
    }
}

impl fmt::Display for AsmItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Directive(directive) => write!(f, "\t{directive}"),
            Self::Label(name) => write!(f, "{name}:"),
            Self::Instruction(instruction) => write!(f, "\t{instruction}"),
        }
    }
}

impl fmt::Display for AsmProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        writeln!(f, "\t.section .note.GNU-stack,\"\",@progbits")
    }
}
