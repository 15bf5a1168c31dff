use super::*;
use crate::lexer;
use crate::parser;
use crate::semantic_analysis::{check_semantic_errors, Diagnostic};

fn lower(source: &str) -> (TInstructions, SymbolTable) {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let mut ast = parser::parse(&tokens, &mut table).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    assert_eq!(check_semantic_errors(&mut ast, &mut table, &mut diagnostics), 0);
    let instructions = emit_tacky(&ast, &mut table);
    (instructions, table)
}

fn listing(source: &str) -> String {
    let (instructions, table) = lower(source);
    Listing::new(&instructions, &table).to_string()
}

#[test]
fn test_while_loop() {
    let source = "int i: 0;
        int f() {
            while i < 10 i = i + 1;
            return i
        }";
    let expected = "\
TAC(tac_init, i, 0, NOP)
TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_label, label.0, NOP, NOP)
TAC(tac_lt, tmp.0, i, 10)
TAC(tac_jump_false, label.1, tmp.0, NOP)
TAC(tac_sum, tmp.1, i, 1)
TAC(tac_move, i, tmp.1, NOP)
TAC(tac_jump, label.0, NOP, NOP)
TAC(tac_label, label.1, NOP, NOP)
TAC(tac_return, i, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
";
    assert_eq!(listing(source), expected);
}

#[test]
fn test_if_else() {
    let source = r#"int f(int a) {
            if a == 0 then print "zero" else print a, "\n";
            return 0
        }"#;
    let expected = r#"TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_param, a, f, NOP)
TAC(tac_eq, tmp.0, a, 0)
TAC(tac_jump_false, label.0, tmp.0, NOP)
TAC(tac_print, "zero", NOP, NOP)
TAC(tac_jump, label.1, NOP, NOP)
TAC(tac_label, label.0, NOP, NOP)
TAC(tac_print, a, NOP, NOP)
TAC(tac_print, "\n", NOP, NOP)
TAC(tac_label, label.1, NOP, NOP)
TAC(tac_return, 0, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
"#;
    assert_eq!(listing(source), expected);
}

#[test]
fn test_if_without_else() {
    let source = "int f(int a) {
            if a > 1 then a = 1;
            return a
        }";
    let expected = "\
TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_param, a, f, NOP)
TAC(tac_gt, tmp.0, a, 1)
TAC(tac_jump_false, label.0, tmp.0, NOP)
TAC(tac_move, a, 1, NOP)
TAC(tac_label, label.0, NOP, NOP)
TAC(tac_return, a, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
";
    assert_eq!(listing(source), expected);
}

#[test]
fn test_call_arguments_follow_their_code() {
    let source = "int g(int a, int b) { return a - b }
        int f() { return g(1 + 2, 3 * 4) }";
    let expected = "\
TAC(tac_begin_function, g, NOP, NOP)
TAC(tac_param, a, g, NOP)
TAC(tac_param, b, g, NOP)
TAC(tac_sub, tmp.0, a, b)
TAC(tac_return, tmp.0, g, NOP)
TAC(tac_end_function, g, NOP, NOP)
TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_sum, tmp.1, 1, 2)
TAC(tac_mul, tmp.2, 3, 4)
TAC(tac_arg, tmp.1, g, NOP)
TAC(tac_arg, tmp.2, g, NOP)
TAC(tac_call, tmp.3, g, NOP)
TAC(tac_return, tmp.3, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
";
    assert_eq!(listing(source), expected);
}

#[test]
fn test_vectors() {
    let source = "char v[2]: 'a' 'b';
        int w[3];
        char f(int i) {
            w[i] = 1;
            return v[i]
        }";
    let expected = "\
TAC(tac_vector_init, v, 2, NOP)
TAC(tac_vector_init_value, v, 'a', NOP)
TAC(tac_vector_init_value, v, 'b', NOP)
TAC(tac_vector_uninit, w, 3, NOP)
TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_param, i, f, NOP)
TAC(tac_vector_move, w, i, 1)
TAC(tac_vector_index, tmp.0, v, i)
TAC(tac_return, tmp.0, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
";
    assert_eq!(listing(source), expected);
}

#[test]
fn test_temporaries_carry_evaluated_type() {
    let (instructions, table) = lower(
        "float x: 1/2;
        int f(char c) {
            print x * 2, c + 1, x < 1;
            c = read;
            return 0
        }",
    );
    let temps: Vec<(&str, DataType)> = table
        .iter()
        .filter(|(_, s)| s.value.starts_with("tmp."))
        .map(|(_, s)| (s.value.as_str(), s.data_type))
        .collect();
    assert_eq!(temps.len(), 4);
    for (name, data_type) in temps {
        let expected = match name {
            "tmp.0" => DataType::Float,
            "tmp.1" => DataType::Int,
            "tmp.2" => DataType::Bool,
            "tmp.3" => DataType::Char,
            _ => unreachable!(),
        };
        assert_eq!(data_type, expected, "{name}");
    }
    assert!(instructions.iter().any(|i| matches!(i, TInstruction::Read(_))));
}

#[test]
fn test_labels_and_goto() {
    let source = "int f() {
            again:
            goto again;
            return 0
        }";
    let expected = "\
TAC(tac_begin_function, f, NOP, NOP)
TAC(tac_label, again, NOP, NOP)
TAC(tac_jump, again, NOP, NOP)
TAC(tac_return, 0, f, NOP)
TAC(tac_end_function, f, NOP, NOP)
";
    assert_eq!(listing(source), expected);
}

#[test]
fn test_no_passthrough_survives() {
    let (instructions, _) = lower(
        "int x: 0;
        int f(int a) { x = a; print x; return a }",
    );
    assert!(!instructions.iter().any(TInstruction::is_passthrough));
}

#[test]
fn test_names_keep_increasing_within_a_run() {
    let source = "int x: 0;
        int f() { x = x + 1; return x * 2 }";
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let mut ast = parser::parse(&tokens, &mut table).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    check_semantic_errors(&mut ast, &mut table, &mut diagnostics);

    let mut generator = TackyGenerator::new(&mut table);
    let first = generator.generate(&ast);
    let second = generator.generate(&ast);
    assert_eq!(first.len(), second.len());
    assert_ne!(first, second);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.opcode(), b.opcode());
    }

    let listing = Listing::new(&second, &table).to_string();
    assert!(listing.contains("tmp.2"));
    assert!(listing.contains("tmp.3"));
    assert!(!listing.contains("tmp.0"));
}

#[test]
fn test_fresh_generator_is_deterministic() {
    let source = "int f(int a) { while a > 0 a = a - 1; return a }";
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let mut ast = parser::parse(&tokens, &mut table).unwrap();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    check_semantic_errors(&mut ast, &mut table, &mut diagnostics);

    let first = emit_tacky(&ast, &mut table);
    let second = emit_tacky(&ast, &mut table);
    assert_eq!(first, second);
}
