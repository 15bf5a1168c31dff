use super::*;
use crate::lexer;
use crate::parser;
use crate::semantic_analysis::{check_semantic_errors, Diagnostic};
use crate::symtab::SymbolTable;
use crate::tacky::emit_tacky;

fn emit(source: &str) -> String {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let mut ast = parser::parse(&tokens, &mut table).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    assert_eq!(check_semantic_errors(&mut ast, &mut table, &mut diagnostics), 0);
    let tacky = emit_tacky(&ast, &mut table);
    codegen(&tacky, &table).unwrap().to_string()
}

#[test]
fn test_data_only_program() {
    let expected = "\t.section .rodata
.Lfmt.int:
\t.string \"%d\"
.Lfmt.char:
\t.string \"%c\"
.Lfmt.float:
\t.string \"%f\"
\t.data
\t.align 4
x:
\t.long 1
\t.section .note.GNU-stack,\"\",@progbits
";
    assert_eq!(emit("int x: 1;"), expected);
}

#[test]
fn test_function_frame() {
    let asm = emit("int main() { return 0 }");
    let lines: Vec<&str> = asm.lines().collect();
    let start = lines.iter().position(|l| *l == "main:").unwrap();
    assert_eq!(lines[start - 1], "\t.globl main");
    assert_eq!(
        lines[start + 1..start + 4],
        ["\tpushq %rbp", "\tmovq %rsp, %rbp", "\tandq $-16, %rsp"]
    );
    assert!(lines.contains(&"\tmovl $0, %eax"));
    assert!(lines.contains(&"\tjmp .Lmain.return"));
    assert!(lines.contains(&"\t.Lmain.return:"));
    assert!(asm.contains("\tmovq %rbp, %rsp\n\tpopq %rbp\n\tret\n"));
}

#[test]
fn test_instruction_syntax() {
    let cases = [
        (
            AsmInstruction::Mov(
                AsmType::Byte,
                Operand::Reg(Register::AX),
                Operand::Data("c".into()),
            ),
            "movb %al, c(%rip)",
        ),
        (
            AsmInstruction::Mov(
                AsmType::Longword,
                Operand::Reg(Register::AX),
                Operand::Indexed {
                    base: Register::DX,
                    index: Register::CX,
                    scale: 4,
                },
            ),
            "movl %eax, (%rdx,%rcx,4)",
        ),
        (
            AsmInstruction::Binary(
                AsmType::Single,
                AsmBinaryOp::Imul,
                Operand::Reg(Register::XMM1),
                Operand::Reg(Register::XMM0),
            ),
            "mulss %xmm1, %xmm0",
        ),
        (
            AsmInstruction::Binary(
                AsmType::Single,
                AsmBinaryOp::DivSingle,
                Operand::Reg(Register::XMM1),
                Operand::Reg(Register::XMM0),
            ),
            "divss %xmm1, %xmm0",
        ),
        (
            AsmInstruction::Cmp(
                AsmType::Single,
                Operand::Reg(Register::XMM1),
                Operand::Reg(Register::XMM0),
            ),
            "ucomiss %xmm1, %xmm0",
        ),
        (
            AsmInstruction::SetCC(Condition::AE, Operand::Reg(Register::AX)),
            "setae %al",
        ),
        (
            AsmInstruction::Movsx(Operand::Data("c".into()), Operand::Reg(Register::SI)),
            "movsbl c(%rip), %esi",
        ),
        (
            AsmInstruction::Cvtsi2ss(Operand::Reg(Register::R11), Operand::Reg(Register::XMM1)),
            "cvtsi2ssl %r11d, %xmm1",
        ),
        (
            AsmInstruction::Movd(Operand::Reg(Register::XMM0), Operand::Reg(Register::AX)),
            "movd %xmm0, %eax",
        ),
        (
            AsmInstruction::Mov(AsmType::Longword, Operand::Stack(24), Operand::Reg(Register::AX)),
            "movl 24(%rbp), %eax",
        ),
    ];
    for (instruction, expected) in cases {
        assert_eq!(instruction.to_string(), expected);
    }
}

#[test]
fn test_directive_syntax() {
    let comm = AsmDirective::Comm {
        name: "tmp.0".into(),
        size: 4,
        alignment: 4,
    };
    assert_eq!(comm.to_string(), ".comm tmp.0,4,4");
    assert_eq!(AsmDirective::Byte(97).to_string(), ".byte 97");
    assert_eq!(
        AsmDirective::String("100%%".into()).to_string(),
        ".string \"100%%\""
    );
}
