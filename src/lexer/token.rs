use std::fmt;
use std::ops::Deref;

/// Token with attached line number to it.
///
/// To get inner [Token] use [Token::from] to consume or [get_inner](LinedToken::get_inner) to borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct LinedToken {
    pub(crate) inner: Token,
    ln: u64,
}

impl From<LinedToken> for Token {
    fn from(value: LinedToken) -> Self {
        value.inner
    }
}

/// Basic token type
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Token {
    /// int keyword
    Int,
    /// char keyword
    Char,
    /// float keyword
    Float,
    If,
    Then,
    Else,
    While,
    Read,
    Print,
    Return,
    Goto,
    /// any other word (variable, vector, function and label names)
    Identifier(String),
    /// decimal integer literal, kept as written
    IntLiteral(String),
    /// character literal including its quotes (e.g. 'a')
    CharLiteral(String),
    /// string literal including its quotes
    StringLiteral(String),
    /// (
    OpenParanth,
    /// )
    CloseParanth,
    /// [
    OpenBracket,
    /// ]
    CloseBracket,
    /// {
    OpenCurly,
    /// }
    CloseCurly,
    Comma,
    Semicolon,
    Colon,
    /// +
    Plus,
    /// -
    Hyphen,
    /// *
    Asterisk,
    /// /
    FSlash,
    IsLessThan,
    IsGreaterThan,
    IsLessThanOrEqual,
    IsGreaterThanOrEqual,
    IsEqual,
    IsNotEqual,
    /// =
    Assign,
}

impl LinedToken {
    pub fn new(t: Token, ln: u64) -> Self {
        Self { inner: t, ln }
    }

    pub fn get_line(&self) -> u64 {
        self.ln
    }

    pub fn get_inner(&self) -> &Token {
        &self.inner
    }
}

impl Deref for LinedToken {
    type Target = Token;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Token {
    #[inline]
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Int | Self::Char | Self::Float)
    }

    #[inline]
    pub fn is_binaryop(&self) -> bool {
        matches!(
            self,
            Self::Plus
                | Self::Hyphen
                | Self::Asterisk
                | Self::FSlash
                | Self::IsLessThan
                | Self::IsGreaterThan
                | Self::IsLessThanOrEqual
                | Self::IsGreaterThanOrEqual
                | Self::IsEqual
                | Self::IsNotEqual
        )
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::IntLiteral(_) | Self::CharLiteral(_) | Self::StringLiteral(_)
        )
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        match s.as_str() {
            "int" => Self::Int,
            "char" => Self::Char,
            "float" => Self::Float,
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "while" => Self::While,
            "read" => Self::Read,
            "print" => Self::Print,
            "return" => Self::Return,
            "goto" => Self::Goto,
            _ => Self::Identifier(s),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Identifier(s)
            | Self::IntLiteral(s)
            | Self::CharLiteral(s)
            | Self::StringLiteral(s) => write!(f, "{s}"),
            Self::Int => write!(f, "int"),
            Self::Char => write!(f, "char"),
            Self::Float => write!(f, "float"),
            Self::If => write!(f, "if"),
            Self::Then => write!(f, "then"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::Read => write!(f, "read"),
            Self::Print => write!(f, "print"),
            Self::Return => write!(f, "return"),
            Self::Goto => write!(f, "goto"),
            Self::OpenParanth => write!(f, "("),
            Self::CloseParanth => write!(f, ")"),
            Self::OpenBracket => write!(f, "["),
            Self::CloseBracket => write!(f, "]"),
            Self::OpenCurly => write!(f, "{{"),
            Self::CloseCurly => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::Plus => write!(f, "+"),
            Self::Hyphen => write!(f, "-"),
            Self::Asterisk => write!(f, "*"),
            Self::FSlash => write!(f, "/"),
            Self::IsLessThan => write!(f, "<"),
            Self::IsGreaterThan => write!(f, ">"),
            Self::IsLessThanOrEqual => write!(f, "<="),
            Self::IsGreaterThanOrEqual => write!(f, ">="),
            Self::IsEqual => write!(f, "=="),
            Self::IsNotEqual => write!(f, "!="),
            Self::Assign => write!(f, "="),
        }
    }
}
