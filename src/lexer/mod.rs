mod cursor;
mod lexer_error;
#[cfg(test)]
mod lexer_tests;
mod token;

use cursor::Cursor;
pub use lexer_error::{InnerLexError, LexError};
pub use token::{LinedToken, Token};

pub type Result<T> = std::result::Result<T, LexError>;
type InnerResult<T> = std::result::Result<T, InnerLexError>;

fn lex_separator(c: char) -> Option<Token> {
    match c {
        ';' => Some(Token::Semicolon),
        ',' => Some(Token::Comma),
        ':' => Some(Token::Colon),
        '(' => Some(Token::OpenParanth),
        ')' => Some(Token::CloseParanth),
        '[' => Some(Token::OpenBracket),
        ']' => Some(Token::CloseBracket),
        '{' => Some(Token::OpenCurly),
        '}' => Some(Token::CloseCurly),
        '+' => Some(Token::Plus),
        '-' => Some(Token::Hyphen),
        '*' => Some(Token::Asterisk),
        '/' => Some(Token::FSlash),
        _ => None,
    }
}

fn lex_mchar_operator(cursor: &mut Cursor) -> InnerResult<Token> {
    let first = cursor.take().ok_or(InnerLexError::UnexpectedChar('\0'))?;
    let has_eq = cursor.skip_if(|c| c == '=');
    match (first, has_eq) {
        ('<', true) => Ok(Token::IsLessThanOrEqual),
        ('>', true) => Ok(Token::IsGreaterThanOrEqual),
        ('=', true) => Ok(Token::IsEqual),
        ('!', true) => Ok(Token::IsNotEqual),
        ('<', false) => Ok(Token::IsLessThan),
        ('>', false) => Ok(Token::IsGreaterThan),
        ('=', false) => Ok(Token::Assign),
        _ => Err(InnerLexError::BadMcharOperator(first.to_string())),
    }
}

fn lex_constant(cursor: &mut Cursor) -> InnerResult<Token> {
    let digits = cursor.take_while(|c| c.is_ascii_digit());
    match cursor.peek() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => Err(InnerLexError::BadConstantSuffix(c)),
        _ => Ok(Token::IntLiteral(digits)),
    }
}

fn lex_identifier(cursor: &mut Cursor) -> Token {
    let word = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
    Token::from(word)
}

fn lex_char(cursor: &mut Cursor) -> InnerResult<Token> {
    let mut buf = String::new();
    cursor.take();
    buf.push('\'');
    match cursor.take() {
        Some('\\') => {
            buf.push('\\');
            let escaped = cursor.take().ok_or(InnerLexError::UnterminatedChar)?;
            buf.push(escaped);
        }
        Some(c) if c != '\'' && c != '\n' => buf.push(c),
        _ => return Err(InnerLexError::UnterminatedChar),
    }
    if !cursor.skip_if(|c| c == '\'') {
        return Err(InnerLexError::UnterminatedChar);
    }
    buf.push('\'');
    Ok(Token::CharLiteral(buf))
}

fn lex_string(cursor: &mut Cursor) -> InnerResult<Token> {
    let mut buf = String::from('"');
    cursor.take();
    loop {
        match cursor.take() {
            Some('"') => break,
            Some('\\') => {
                buf.push('\\');
                let escaped = cursor.take().ok_or(InnerLexError::UnterminatedString)?;
                buf.push(escaped);
            }
            Some('\n') | None => return Err(InnerLexError::UnterminatedString),
            Some(c) => buf.push(c),
        }
    }
    buf.push('"');
    Ok(Token::StringLiteral(buf))
}

fn skip_line_comment(cursor: &mut Cursor) {
    while cursor.peek().is_some_and(|c| c != '\n') {
        cursor.take();
    }
}

fn skip_block_comment(cursor: &mut Cursor) -> InnerResult<()> {
    cursor.take();
    cursor.take();
    loop {
        match cursor.take() {
            Some('*') if cursor.peek() == Some('/') => {
                cursor.take();
                return Ok(());
            }
            Some(_) => (),
            None => return Err(InnerLexError::UnterminatedComment),
        }
    }
}

/// Split source text into line-tagged tokens.
pub fn lex(input: &str) -> Result<Vec<LinedToken>> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(input);

    while let Some(c) = cursor.peek() {
        let line = cursor.get_line();
        let set_line = |err: InnerLexError| err.set_line(line);
        let token = match (c, cursor.peek_2nd()) {
            (c, _) if c.is_whitespace() => {
                cursor.take();
                continue;
            }
            ('/', Some('/')) => {
                skip_line_comment(&mut cursor);
                continue;
            }
            ('/', Some('*')) => {
                skip_block_comment(&mut cursor).map_err(set_line)?;
                continue;
            }
            ('<' | '>' | '=' | '!', _) => lex_mchar_operator(&mut cursor).map_err(set_line)?,
            ('0'..='9', _) => lex_constant(&mut cursor).map_err(set_line)?,
            ('a'..='z' | 'A'..='Z' | '_', _) => lex_identifier(&mut cursor),
            ('\'', _) => lex_char(&mut cursor).map_err(set_line)?,
            ('"', _) => lex_string(&mut cursor).map_err(set_line)?,
            (c, _) => {
                let token = lex_separator(c)
                    .ok_or(InnerLexError::UnexpectedChar(c))
                    .map_err(set_line)?;
                cursor.take();
                token
            }
        };
        tokens.push(LinedToken::new(token, line));
    }

    debug_assert!(cursor.is_eof());
    Ok(tokens)
}
