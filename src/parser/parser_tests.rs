use super::*;
use crate::lexer;
use crate::symtab::Scope;

fn parse_source(source: &str) -> (Result<Ast>, SymbolTable) {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let ast = parse(&tokens, &mut table);
    (ast, table)
}

fn parse_expression(source: &str) -> (Exp, SymbolTable) {
    let tokens = lexer::lex(source).unwrap();
    let mut table = SymbolTable::new();
    let mut cursor = Cursor::new(&tokens, &mut table);
    let exp = parse_exp(&mut cursor, 0).unwrap();
    (exp, table)
}

fn leaf_text<'a>(exp: &Exp, table: &'a SymbolTable) -> &'a str {
    let node = exp.as_symbol().expect("symbol expression");
    &table[node.symbol].value
}

#[test]
fn test_expression_precedence() {
    let (exp, table) = parse_expression("1 * 2 - 3 * (4 + 5)");
    let ExpKind::Binary(BinaryOp::Sub, left, right) = &exp.kind else {
        panic!("expected subtraction at the root, got {exp:?}");
    };
    let ExpKind::Binary(BinaryOp::Mul, a, b) = &left.kind else {
        panic!("expected multiplication on the left");
    };
    assert_eq!(leaf_text(a, &table), "1");
    assert_eq!(leaf_text(b, &table), "2");
    let ExpKind::Binary(BinaryOp::Mul, c, sum) = &right.kind else {
        panic!("expected multiplication on the right");
    };
    assert_eq!(leaf_text(c, &table), "3");
    assert!(matches!(sum.kind, ExpKind::Binary(BinaryOp::Add, _, _)));
}

#[test]
fn test_comparison_binds_loosest() {
    let (exp, _) = parse_expression("a + 1 < b * 2");
    let ExpKind::Binary(BinaryOp::LessThan, left, right) = &exp.kind else {
        panic!("expected comparison at the root");
    };
    assert!(matches!(left.kind, ExpKind::Binary(BinaryOp::Add, _, _)));
    assert!(matches!(right.kind, ExpKind::Binary(BinaryOp::Mul, _, _)));
}

#[test]
fn test_left_associativity() {
    let (exp, table) = parse_expression("a - b - c");
    let ExpKind::Binary(BinaryOp::Sub, left, right) = &exp.kind else {
        panic!("expected subtraction");
    };
    assert!(matches!(left.kind, ExpKind::Binary(BinaryOp::Sub, _, _)));
    assert_eq!(leaf_text(right, &table), "c");
}

#[test]
fn test_declarations() {
    let source = "int x: 1;\nfloat f: 1/2;\nchar v[3]: 'a' 'b' 'c';\nint w[10];\n";
    let (ast, table) = parse_source(source);
    let ast = ast.unwrap();
    assert_eq!(ast.declarations.len(), 4);

    let Declaration::Variable(float) = &ast.declarations[1] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(float.var_type, DataType::Float);
    let divisor = float.divisor.expect("divisor");
    assert_eq!(table[divisor.symbol].value, "2");
    assert_eq!(table[divisor.symbol].kind, SymbolKind::IntLiteral);

    let Declaration::Vector(vector) = &ast.declarations[2] else {
        panic!("expected a vector declaration");
    };
    assert_eq!(vector.init.as_ref().map(Vec::len), Some(3));
    let Declaration::Vector(uninit) = &ast.declarations[3] else {
        panic!("expected a vector declaration");
    };
    assert!(uninit.init.is_none());
}

#[test]
fn test_parser_registers_symbols() {
    let (ast, table) = parse_source("int x: 1;\nint f(int a) {\nx = a + 1\n}\n");
    assert!(ast.is_ok());
    let x = table.get("x", Scope::Global).unwrap();
    assert_eq!(table[x].kind, SymbolKind::Identifier);
    assert_eq!(table[x].line, 1);
    let one = table.get("1", Scope::Global).unwrap();
    assert_eq!(table[one].kind, SymbolKind::IntLiteral);
    assert!(table.get("a", Scope::Global).is_some());
}

#[test]
fn test_scope_stamping() {
    let (ast, table) = parse_source("int x: 1;\nint f(int a) {\nx = a\n}\n");
    let ast = ast.unwrap();
    let f = table.get("f", Scope::Global).unwrap();
    let Declaration::Function(fun) = &ast.declarations[1] else {
        panic!("expected a function");
    };
    assert_eq!(fun.name.scope, Scope::Global);
    assert_eq!(fun.params[0].name.scope, Scope::Function(f));
    let Command::Assign { target, value } = &fun.body.commands[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(target.scope, Scope::Function(f));
    assert_eq!(value.scope, Scope::Function(f));
    assert_eq!(value.as_symbol().unwrap().scope, Scope::Function(f));
}

#[test]
fn test_commands() {
    let source = "int f(int a) {
        loop:
        if a < 10 then a = a + 1 else { print \"big\", a };
        while a > 0 a = a - 1;
        v[a] = read;
        goto loop;
        return f(a)
    }";
    let (ast, _) = parse_source(source);
    let ast = ast.unwrap();
    let Declaration::Function(fun) = &ast.declarations[0] else {
        panic!("expected a function");
    };
    let commands = &fun.body.commands;
    assert_eq!(commands.len(), 6);
    assert!(matches!(commands[0], Command::Label(_)));
    assert!(matches!(commands[1], Command::If { els: Some(_), .. }));
    assert!(matches!(commands[2], Command::While { .. }));
    assert!(matches!(commands[3], Command::VectorAssign { .. }));
    assert!(matches!(commands[4], Command::Goto(_)));
    let Command::Return(exp) = &commands[5] else {
        panic!("expected return");
    };
    assert!(matches!(&exp.kind, ExpKind::Call(_, args) if args.len() == 1));
}

#[test]
fn test_missing_semicolon() {
    let (ast, _) = parse_source("int f() {\na = 1\nb = 2\n}");
    let err = ast.unwrap_err();
    assert_eq!(err.get_ln(), 3);
    assert!(matches!(err.inner, InnerParseError::ExpectedButGot(Token::Semicolon, _)));
}

#[test]
fn test_divisor_only_for_float() {
    let (ast, _) = parse_source("int x: 1/2;");
    assert_eq!(ast.unwrap_err().inner, InnerParseError::DivisorOutsideFloat);
}

#[test]
fn test_bad_vector_size() {
    let (ast, _) = parse_source("int v[n];");
    assert!(matches!(
        ast.unwrap_err().inner,
        InnerParseError::BadVectorSize(Token::Identifier(_))
    ));
}

#[test]
fn test_trailing_comma() {
    let (ast, _) = parse_source("int f(int a,) {}");
    assert_eq!(ast.unwrap_err().inner, InnerParseError::TrailingComma);
}
