use super::*;
use crate::lexer;
use crate::parser;
use crate::symtab::{SymbolKind, SymbolTable};

fn parse_source(source: &str) -> (Ast, SymbolTable) {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let ast = parser::parse(&tokens, &mut table).unwrap();
    (ast, table)
}

#[test]
fn test_decompile_declarations() {
    let source = "int x: 1;\nfloat f: 1/2;\nchar v[2]: 'a' 'b';\nint w[4];\n";
    let (ast, table) = parse_source(source);
    assert_eq!(ast.decompile(&table).to_string(), source);
}

#[test]
fn test_decompile_function() {
    let source = "int f(int a, char b) {\n\
                  start:\n\
                  if a < b then a = a + 1 else print \"no\", a;\n\
                  while a > 0 {\n\
                  a = a - 1;\n\
                  };\n\
                  goto start;\n\
                  return g(a, v[2], read)\n\
                  }\n";
    let (ast, table) = parse_source(source);
    let expected = "int f(int a, char b) {
    start:
    if a < b then a = a + 1 else print \"no\", a;
    while a > 0 {
        a = a - 1;
    };
    goto start;
    return g(a, v[2], read);
}
";
    assert_eq!(ast.decompile(&table).to_string(), expected);
}

#[test]
fn test_decompile_keeps_grouping() {
    let source = "int f() {\nreturn (a + b) * (c - (d - e))\n}";
    let (ast, table) = parse_source(source);
    let expected = "int f() {\n    return (a + b) * (c - (d - e));\n}\n";
    assert_eq!(ast.decompile(&table).to_string(), expected);
}

#[test]
fn test_decompile_reparses_to_same_text() {
    let source = "int x: 3;\nint f(int a) {\nif a == x then { x = a * 2 / 3 };\nreturn x\n}\n";
    let (ast, table) = parse_source(source);
    let first = ast.decompile(&table).to_string();
    let (reparsed, table) = parse_source(&first);
    assert_eq!(reparsed.decompile(&table).to_string(), first);
}

#[test]
fn test_set_symbol_and_type() {
    let (mut ast, mut table) = parse_source("int f(int a) {\nreturn a\n}");
    let f = table.get("f", Scope::Global).unwrap();
    let shadow = table.add_with_scope("a", SymbolKind::Parameter, 1, Scope::Function(f));
    let Declaration::Function(fun) = &mut ast.declarations[0] else {
        panic!("expected a function");
    };
    let Command::Return(exp) = &mut fun.body.commands[0] else {
        panic!("expected return");
    };
    exp.set_evaluated_type(DataType::Int);
    exp.for_each_leaf_mut(&mut |leaf| leaf.set_symbol(shadow));
    assert_eq!(exp.get_type(), DataType::Int);
    assert_eq!(exp.as_symbol().map(|leaf| leaf.symbol), Some(shadow));
}

#[test]
fn test_leaf_order() {
    let (mut ast, table) = parse_source("int v[2]: 7 8;\nint f(int a) {\nv[a] = a + 9\n}");
    let mut seen = Vec::new();
    ast.for_each_leaf_mut(&mut |leaf| seen.push(leaf.symbol));
    let texts: Vec<_> = seen.iter().map(|&id| table[id].value.as_str()).collect();
    assert_eq!(texts, vec!["v", "2", "7", "8", "f", "a", "v", "a", "a", "9"]);
}
