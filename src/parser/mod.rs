mod cursor;
mod parse_error;
#[cfg(test)]
mod parser_tests;

use crate::ast::*;
use crate::lexer::{LinedToken, Token};
use crate::symtab::{DataType, SymbolKind, SymbolTable};
use cursor::Cursor;
pub use parse_error::{InnerParseError, ParseError, Result};

#[allow(clippy::match_same_arms)]
fn get_prec(token: &Token) -> u64 {
    match token {
        Token::Asterisk => 50,
        Token::FSlash => 50,
        Token::Plus => 45,
        Token::Hyphen => 45,
        Token::IsLessThan => 30,
        Token::IsLessThanOrEqual => 30,
        Token::IsGreaterThan => 30,
        Token::IsGreaterThanOrEqual => 30,
        Token::IsEqual => 30,
        Token::IsNotEqual => 30,
        _ => 0,
    }
}

impl TryFrom<&Token> for BinaryOp {
    type Error = InnerParseError;
    fn try_from(value: &Token) -> std::result::Result<Self, InnerParseError> {
        match value {
            Token::Plus => Ok(BinaryOp::Add),
            Token::Hyphen => Ok(BinaryOp::Sub),
            Token::Asterisk => Ok(BinaryOp::Mul),
            Token::FSlash => Ok(BinaryOp::Div),
            Token::IsLessThan => Ok(BinaryOp::LessThan),
            Token::IsGreaterThan => Ok(BinaryOp::GreaterThan),
            Token::IsLessThanOrEqual => Ok(BinaryOp::LessOrEqual),
            Token::IsGreaterThanOrEqual => Ok(BinaryOp::GreaterOrEqual),
            Token::IsEqual => Ok(BinaryOp::IsEqual),
            Token::IsNotEqual => Ok(BinaryOp::IsNotEqual),
            _ => Err(InnerParseError::UnexpectedToken(value.clone())),
        }
    }
}

fn parse_type(cursor: &mut Cursor) -> Result<DataType> {
    let line = cursor.get_line();
    match cursor.next_or_error()? {
        Token::Int => Ok(DataType::Int),
        Token::Char => Ok(DataType::Char),
        Token::Float => Ok(DataType::Float),
        t => Err(InnerParseError::ExpectedTypeButGot(t.clone()).set_line(line)),
    }
}

fn parse_identifier(cursor: &mut Cursor) -> Result<SymbolNode> {
    let line = cursor.get_line();
    let next = cursor.next_or_error()?;
    if let Token::Identifier(name) = next {
        Ok(cursor.add_symbol(name, SymbolKind::Identifier, line))
    } else {
        Err(InnerParseError::ExpectedIdentifierButGot(next.clone()).set_line(line))
    }
}

fn parse_literal(cursor: &mut Cursor) -> Result<SymbolNode> {
    let line = cursor.get_line();
    let (text, kind) = match cursor.next_or_error()? {
        Token::IntLiteral(s) => (s, SymbolKind::IntLiteral),
        Token::CharLiteral(s) => (s, SymbolKind::CharLiteral),
        Token::StringLiteral(s) => (s, SymbolKind::StringLiteral),
        t => return Err(InnerParseError::ExpectedLiteralButGot(t.clone()).set_line(line)),
    };
    Ok(cursor.add_symbol(text, kind, line))
}

fn parse_binary_op(cursor: &mut Cursor) -> Result<BinaryOp> {
    let line = cursor.get_line();
    let next = cursor.next_or_error()?;
    BinaryOp::try_from(next).map_err(|err| err.set_line(line))
}

fn parse_exp_binary(cursor: &mut Cursor, prec: u64, left: Exp) -> Result<Exp> {
    let op = parse_binary_op(cursor)?;
    let right = parse_exp(cursor, prec + 1).map(Box::new)?;
    Ok(Exp::binary(op, Box::new(left), right))
}

fn parse_exp(cursor: &mut Cursor, min_prec: u64) -> Result<Exp> {
    let mut left = parse_factor(cursor)?;

    while let Some(next_token) = cursor.peek().filter(|t| t.is_binaryop()) {
        let prec = get_prec(next_token);
        if prec < min_prec {
            break;
        }
        left = parse_exp_binary(cursor, prec, left)?;
    }

    Ok(left)
}

fn parse_arguments(cursor: &mut Cursor) -> Result<Vec<Exp>> {
    let mut args = Vec::new();
    if cursor.bump_if(&Token::CloseParanth) {
        return Ok(args);
    }
    loop {
        args.push(parse_exp(cursor, 0)?);
        if !cursor.bump_if(&Token::Comma) {
            break;
        }
    }
    cursor.expect(&Token::CloseParanth)?;
    Ok(args)
}

fn parse_factor_identifier(cursor: &mut Cursor) -> Result<Exp> {
    let name = parse_identifier(cursor)?;
    if cursor.bump_if(&Token::OpenParanth) {
        let args = parse_arguments(cursor)?;
        Ok(Exp::call(name, args))
    } else if cursor.bump_if(&Token::OpenBracket) {
        let index = parse_exp(cursor, 0).map(Box::new)?;
        cursor.expect(&Token::CloseBracket)?;
        Ok(Exp::vector_index(name, index))
    } else {
        Ok(Exp::symbol(name))
    }
}

fn parse_factor_subexp(cursor: &mut Cursor) -> Result<Exp> {
    cursor.expect(&Token::OpenParanth)?;
    let exp = parse_exp(cursor, 0)?;
    cursor.expect(&Token::CloseParanth)?;
    Ok(exp)
}

fn parse_factor(cursor: &mut Cursor) -> Result<Exp> {
    let line = cursor.get_line();
    let next = cursor.peek_or_error()?;
    match next {
        t if t.is_literal() => parse_literal(cursor).map(Exp::symbol),
        Token::Read => {
            cursor.bump();
            Ok(Exp::read())
        }
        Token::Identifier(_) => parse_factor_identifier(cursor),
        Token::OpenParanth => parse_factor_subexp(cursor),
        t => Err(InnerParseError::BadFactor(t.clone()).set_line(line)),
    }
}

fn parse_print(cursor: &mut Cursor) -> Result<Command> {
    cursor.expect(&Token::Print)?;
    let mut printables = vec![parse_exp(cursor, 0)?];
    while cursor.bump_if(&Token::Comma) {
        printables.push(parse_exp(cursor, 0)?);
    }
    Ok(Command::Print(printables))
}

fn parse_return(cursor: &mut Cursor) -> Result<Command> {
    cursor.expect(&Token::Return)?;
    let exp = parse_exp(cursor, 0)?;
    Ok(Command::Return(exp))
}

fn parse_goto(cursor: &mut Cursor) -> Result<Command> {
    cursor.expect(&Token::Goto)?;
    let label = parse_identifier(cursor)?;
    Ok(Command::Goto(label))
}

fn parse_if(cursor: &mut Cursor) -> Result<Command> {
    cursor.expect(&Token::If)?;
    let condition = parse_exp(cursor, 0)?;
    cursor.expect(&Token::Then)?;
    let then = parse_command(cursor).map(Box::new)?;
    let els = cursor
        .bump_if(&Token::Else)
        .then(|| parse_command(cursor).map(Box::new))
        .transpose()?;
    Ok(Command::If {
        condition,
        then,
        els,
    })
}

fn parse_while(cursor: &mut Cursor) -> Result<Command> {
    cursor.expect(&Token::While)?;
    let condition = parse_exp(cursor, 0)?;
    let body = parse_command(cursor).map(Box::new)?;
    Ok(Command::While { condition, body })
}

fn parse_assignment(cursor: &mut Cursor) -> Result<Command> {
    let target = parse_identifier(cursor)?;
    if cursor.bump_if(&Token::OpenBracket) {
        let index = parse_exp(cursor, 0)?;
        cursor.expect(&Token::CloseBracket)?;
        cursor.expect(&Token::Assign)?;
        let value = parse_exp(cursor, 0)?;
        return Ok(Command::VectorAssign {
            target,
            index,
            value,
        });
    }
    cursor.expect(&Token::Assign)?;
    let value = parse_exp(cursor, 0)?;
    Ok(Command::Assign { target, value })
}

fn parse_command(cursor: &mut Cursor) -> Result<Command> {
    let line = cursor.get_line();
    match cursor.peek_or_error()? {
        Token::Identifier(_) => parse_assignment(cursor),
        Token::Print => parse_print(cursor),
        Token::Return => parse_return(cursor),
        Token::Goto => parse_goto(cursor),
        Token::If => parse_if(cursor),
        Token::While => parse_while(cursor),
        Token::OpenCurly => parse_block(cursor).map(Command::Block),
        t => Err(InnerParseError::UnexpectedToken(t.clone()).set_line(line)),
    }
}

fn is_label(cursor: &Cursor) -> bool {
    matches!(cursor.peek(), Some(Token::Identifier(_))) && cursor.peek_nth(1) == Some(&Token::Colon)
}

fn parse_block(cursor: &mut Cursor) -> Result<Block> {
    cursor.expect(&Token::OpenCurly)?;
    let mut commands = Vec::new();
    while !cursor.bump_if(&Token::CloseCurly) {
        if cursor.bump_if(&Token::Semicolon) {
            continue;
        }
        if is_label(cursor) {
            let label = parse_identifier(cursor)?;
            cursor.expect(&Token::Colon)?;
            commands.push(Command::Label(label));
            continue;
        }
        commands.push(parse_command(cursor)?);
        if cursor.peek() != Some(&Token::CloseCurly) {
            cursor.expect(&Token::Semicolon)?;
        }
    }
    Ok(Block { commands })
}

fn parse_params(cursor: &mut Cursor) -> Result<Vec<Param>> {
    let mut params = Vec::new();
    if cursor.bump_if(&Token::CloseParanth) {
        return Ok(params);
    }

    loop {
        let param_type = parse_type(cursor)?;
        let name = parse_identifier(cursor)?;
        params.push(Param { param_type, name });
        if !cursor.bump_if(&Token::Comma) {
            break;
        }
        if cursor.peek() == Some(&Token::CloseParanth) {
            let line = cursor.get_line();
            return Err(InnerParseError::TrailingComma.set_line(line));
        }
    }
    cursor.expect(&Token::CloseParanth)?;
    Ok(params)
}

fn parse_variable_declaration(
    cursor: &mut Cursor,
    var_type: DataType,
    name: SymbolNode,
) -> Result<Declaration> {
    cursor.expect(&Token::Colon)?;
    let init = parse_literal(cursor)?;
    let line = cursor.get_line();
    let divisor = cursor
        .bump_if(&Token::FSlash)
        .then(|| parse_literal(cursor))
        .transpose()?;
    if divisor.is_some() && var_type != DataType::Float {
        return Err(InnerParseError::DivisorOutsideFloat.set_line(line));
    }
    cursor.expect(&Token::Semicolon)?;
    Ok(Declaration::Variable(VarDec {
        var_type,
        name,
        init,
        divisor,
    }))
}

fn parse_vector_declaration(
    cursor: &mut Cursor,
    var_type: DataType,
    name: SymbolNode,
) -> Result<Declaration> {
    cursor.expect(&Token::OpenBracket)?;
    let line = cursor.get_line();
    let size_token = cursor.peek_or_error()?;
    if !matches!(size_token, Token::IntLiteral(_)) {
        return Err(InnerParseError::BadVectorSize(size_token.clone()).set_line(line));
    }
    let size = parse_literal(cursor)?;
    cursor.expect(&Token::CloseBracket)?;

    let init = if cursor.bump_if(&Token::Colon) {
        let mut values = Vec::new();
        while cursor.peek() != Some(&Token::Semicolon) {
            values.push(parse_literal(cursor)?);
        }
        Some(values)
    } else {
        None
    };
    cursor.expect(&Token::Semicolon)?;
    Ok(Declaration::Vector(VecDec {
        var_type,
        name,
        size,
        init,
    }))
}

fn parse_declaration(cursor: &mut Cursor) -> Result<Declaration> {
    let var_type = parse_type(cursor)?;
    let name = parse_identifier(cursor)?;
    let line = cursor.get_line();

    match cursor.peek_or_error()? {
        Token::Colon => parse_variable_declaration(cursor, var_type, name),
        Token::OpenBracket => parse_vector_declaration(cursor, var_type, name),
        Token::OpenParanth => {
            cursor.bump();
            let params = parse_params(cursor)?;
            let body = parse_block(cursor)?;
            Ok(Declaration::Function(FunDec {
                return_type: var_type,
                name,
                params,
                body,
            }))
        }
        t => Err(InnerParseError::UnexpectedToken(t.clone()).set_line(line)),
    }
}

/// Build the syntax tree, registering every literal and identifier in `table` on the way.
///
/// Identifiers are registered unresolved at GLOBAL scope; binding them is left to semantic
/// analysis.
pub fn parse(tokens: &[LinedToken], table: &mut SymbolTable) -> Result<Ast> {
    let mut declarations = Vec::new();
    let mut cursor = Cursor::new(tokens, table);

    while !cursor.at_end() {
        let declaration = parse_declaration(&mut cursor)?;
        declarations.push(declaration);
    }
    let mut ast = Ast { declarations };
    ast.stamp_scopes();
    Ok(ast)
}
