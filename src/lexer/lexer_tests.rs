use super::*;

fn inner(tokens: Vec<LinedToken>) -> Vec<Token> {
    tokens.into_iter().map(Token::from).collect()
}

#[test]
fn test_basic_declarations() {
    let lexed = lex("int x: 1;\nchar c: 'a';").map(inner);
    let expected = vec![
        Token::Int,
        Token::Identifier("x".into()),
        Token::Colon,
        Token::IntLiteral("1".into()),
        Token::Semicolon,
        Token::Char,
        Token::Identifier("c".into()),
        Token::Colon,
        Token::CharLiteral("'a'".into()),
        Token::Semicolon,
    ];
    assert_eq!(Ok(expected), lexed);
}

#[test]
fn test_operators() {
    let lexed = lex("a <= b >= c == d != e < f > g = h").map(inner);
    let id = |s: &str| Token::Identifier(s.into());
    let expected = vec![
        id("a"),
        Token::IsLessThanOrEqual,
        id("b"),
        Token::IsGreaterThanOrEqual,
        id("c"),
        Token::IsEqual,
        id("d"),
        Token::IsNotEqual,
        id("e"),
        Token::IsLessThan,
        id("f"),
        Token::IsGreaterThan,
        id("g"),
        Token::Assign,
        id("h"),
    ];
    assert_eq!(Ok(expected), lexed);
}

#[test]
fn test_keywords_and_strings() {
    let lexed = lex("while x print \"a, \\\"b\\\"\", read").map(inner);
    let expected = vec![
        Token::While,
        Token::Identifier("x".into()),
        Token::Print,
        Token::StringLiteral("\"a, \\\"b\\\"\"".into()),
        Token::Comma,
        Token::Read,
    ];
    assert_eq!(Ok(expected), lexed);
}

#[test]
fn test_line_numbers() {
    let tokens = lex("int\n// comment\nx /* multi\nline */ y").unwrap();
    let lines: Vec<_> = tokens.iter().map(LinedToken::get_line).collect();
    assert_eq!(lines, vec![1, 3, 4]);
}

#[test]
fn test_bad_atsign() {
    let err = lex("int x: 1;\nx = 0@1").unwrap_err();
    assert_eq!(err.get_inner(), &InnerLexError::UnexpectedChar('@'));
    assert_eq!(err.get_ln(), 2);
}

#[test]
fn test_bad_constant() {
    let err = lex("x = 1foo").unwrap_err();
    assert_eq!(err.get_inner(), &InnerLexError::BadConstantSuffix('f'));
}

#[test]
fn test_lone_bang() {
    let err = lex("a ! b").unwrap_err();
    assert_eq!(err.get_inner(), &InnerLexError::BadMcharOperator("!".into()));
}

#[test]
fn test_unterminated_literals() {
    let err = lex("print \"abc").unwrap_err();
    assert_eq!(err.get_inner(), &InnerLexError::UnterminatedString);
    let err = lex("c = 'ab'").unwrap_err();
    assert_eq!(err.get_inner(), &InnerLexError::UnterminatedChar);
}
