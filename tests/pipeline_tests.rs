#![cfg(feature = "emission")]

use lilc::ast::Ast;
use lilc::semantic_analysis::{self, SemAnalysisError, WriterSink};
use lilc::symtab::SymbolTable;
use lilc::tacky::{emit_tacky, TInstruction};
use lilc::{codegen, lexer, parser};

const PROGRAM: &str = r#"
int count: 0;
float ratio: 3/4;
char letters[3]: 'a' 'b' 'c';
int squares[4];

/* fills squares and returns the sum */
int fill(int n) {
    count = 0;
    while count < n {
        squares[count] = count * count;
        count = count + 1
    };
    return squares[0] + squares[1] + squares[2] + squares[3]
}

float scale(float x) {
    return x * ratio
}

int main() {
    print "sum: ", fill(4), "\n";
    print scale(2), "\n";
    if letters[1] == 'b' then print letters[1] else goto done;
    print "\n";
    done:
    return 0
}
"#;

fn front_end(source: &str) -> (Ast, SymbolTable) {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let ast = parser::parse(&tokens, &mut table).unwrap();
    (ast, table)
}

fn validate(ast: &mut Ast, table: &mut SymbolTable) -> (Result<(), SemAnalysisError>, String) {
    let mut buffer = Vec::new();
    let mut sink = WriterSink::new(&mut buffer);
    let result = semantic_analysis::validate(ast, table, &mut sink);
    sink.finish().unwrap();
    (result, String::from_utf8(buffer).unwrap())
}

#[test]
fn test_program_compiles_to_assembly() {
    let (mut ast, mut table) = front_end(PROGRAM);
    let (result, diagnostics) = validate(&mut ast, &mut table);
    assert_eq!(result, Ok(()));
    assert_eq!(diagnostics, "");

    let tacky = emit_tacky(&ast, &mut table);
    let asm = codegen::codegen(&tacky, &table).unwrap().to_string();

    for expected in [
        "fill:",
        "scale:",
        "main:",
        "\t.globl main",
        "ratio:",
        "\t.comm squares,16,4",
        "\t.comm fill.n,4,4",
        "\tcall fill",
        "\tcall printf",
        "\t.string \"sum: \"",
        "\t.Lmain.done:",
        "\tjmp .Lmain.done",
    ] {
        assert!(asm.lines().any(|line| line == expected), "missing {expected:?}");
    }
    assert!(asm.ends_with("\t.section .note.GNU-stack,\"\",@progbits\n"));
}

#[test]
fn test_first_instruction_after_declarations_begins_first_function() {
    let (mut ast, mut table) = front_end(PROGRAM);
    validate(&mut ast, &mut table).0.unwrap();
    let tacky = emit_tacky(&ast, &mut table);

    let first = tacky
        .iter()
        .find(|i| {
            !matches!(
                i,
                TInstruction::Init { .. }
                    | TInstruction::VectorInit { .. }
                    | TInstruction::VectorInitValue { .. }
                    | TInstruction::VectorUninit { .. }
            )
        })
        .unwrap();
    let fill = table.get("fill", Default::default()).unwrap();
    assert_eq!(*first, TInstruction::BeginFunction(fill));
}

#[test]
fn test_while_lowering_shape() {
    let (mut ast, mut table) = front_end("int x: 0; int f() { while x < 3 x = x + 1; return x }");
    validate(&mut ast, &mut table).0.unwrap();
    let tacky = emit_tacky(&ast, &mut table);

    // skip init, begin_function; drop return, end_function
    let body = &tacky[2..tacky.len() - 2];
    let n = body.len();
    let TInstruction::Label(begin) = body[0] else {
        panic!("loop does not start with a label: {:?}", body[0]);
    };
    let TInstruction::Label(end) = body[n - 1] else {
        panic!("loop does not end with a label: {:?}", body[n - 1]);
    };
    assert_eq!(body[2], TInstruction::JumpFalse { target: end, condition: body[1].res() });
    assert_eq!(body[n - 2], TInstruction::Jump(begin));
    assert_ne!(begin, end);
}

#[test]
fn test_semantic_errors_are_all_reported() {
    let source = "int x: 1;
        int x: 2;
        int v[3]: 1 2;
        int f(int a, int b) { return a + b }
        int main() { y = f(1); return 0 }";
    let (mut ast, mut table) = front_end(source);
    let (result, diagnostics) = validate(&mut ast, &mut table);
    assert_eq!(result, Err(SemAnalysisError { errors: 4 }));

    let lines: Vec<&str> = diagnostics.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("GLOBAL: redeclared identifier 'x'"));
    assert!(lines[1].starts_with("GLOBAL: vector 'v'"));
    assert_eq!(lines[2], "main: undefined identifier 'y'");
    assert!(lines[3].starts_with("main: too few arguments in call to 'f'"));
}

#[test]
fn test_front_end_errors_carry_lines() {
    let lex_error = lexer::lex("int x: 1;\nint y: 2$;").unwrap_err();
    assert_eq!(lex_error.get_ln(), 2);

    let tokens = lexer::lex("int f() {\n  x = 1\n  y = 2\n}").unwrap();
    let mut table = SymbolTable::new();
    let parse_error = parser::parse(&tokens, &mut table).unwrap_err();
    assert_eq!(parse_error.get_ln(), 3);
}
