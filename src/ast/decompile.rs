use super::*;
use crate::symtab::SymbolTable;
use std::fmt::{self, Display, Formatter, Write};

const INDENT: &str = "    ";

/// Source text reconstructed from an [`Ast`], see [`Ast::decompile`].
pub struct Decompiled<'a> {
    ast: &'a Ast,
    table: &'a SymbolTable,
}

impl Ast {
    pub fn decompile<'a>(&'a self, table: &'a SymbolTable) -> Decompiled<'a> {
        Decompiled { ast: self, table }
    }
}

impl Decompiled<'_> {
    fn text(&self, node: &SymbolNode) -> &str {
        &self.table[node.symbol].value
    }

    fn write_declaration(&self, f: &mut Formatter, declaration: &Declaration) -> fmt::Result {
        match declaration {
            Declaration::Variable(VarDec {
                var_type,
                name,
                init,
                divisor,
            }) => {
                write!(f, "{var_type} {}: {}", self.text(name), self.text(init))?;
                if let Some(divisor) = divisor {
                    write!(f, "/{}", self.text(divisor))?;
                }
                writeln!(f, ";")
            }
            Declaration::Vector(VecDec {
                var_type,
                name,
                size,
                init,
            }) => {
                write!(f, "{var_type} {}[{}]", self.text(name), self.text(size))?;
                if let Some(values) = init {
                    f.write_char(':')?;
                    for value in values {
                        write!(f, " {}", self.text(value))?;
                    }
                }
                writeln!(f, ";")
            }
            Declaration::Function(FunDec {
                return_type,
                name,
                params,
                body,
            }) => {
                write!(f, "{return_type} {}(", self.text(name))?;
                for (i, Param { param_type, name }) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param_type} {}", self.text(name))?;
                }
                f.write_str(") ")?;
                self.write_block(f, body, 0)?;
                writeln!(f)
            }
        }
    }

    fn write_block(&self, f: &mut Formatter, block: &Block, depth: usize) -> fmt::Result {
        writeln!(f, "{{")?;
        for command in &block.commands {
            write!(f, "{}", INDENT.repeat(depth + 1))?;
            self.write_command(f, command, depth + 1)?;
            if matches!(command, Command::Label(_)) {
                writeln!(f)?;
            } else {
                writeln!(f, ";")?;
            }
        }
        write!(f, "{}}}", INDENT.repeat(depth))
    }

    fn write_command(&self, f: &mut Formatter, command: &Command, depth: usize) -> fmt::Result {
        match command {
            Command::Assign { target, value } => {
                write!(f, "{} = ", self.text(target))?;
                self.write_exp(f, value)
            }
            Command::VectorAssign {
                target,
                index,
                value,
            } => {
                write!(f, "{}[", self.text(target))?;
                self.write_exp(f, index)?;
                f.write_str("] = ")?;
                self.write_exp(f, value)
            }
            Command::Print(printables) => {
                f.write_str("print ")?;
                self.write_list(f, printables)
            }
            Command::Return(exp) => {
                f.write_str("return ")?;
                self.write_exp(f, exp)
            }
            Command::Goto(label) => write!(f, "goto {}", self.text(label)),
            Command::Label(label) => write!(f, "{}:", self.text(label)),
            Command::If {
                condition,
                then,
                els,
            } => {
                f.write_str("if ")?;
                self.write_exp(f, condition)?;
                f.write_str(" then ")?;
                self.write_command(f, then, depth)?;
                if let Some(els) = els {
                    f.write_str(" else ")?;
                    self.write_command(f, els, depth)?;
                }
                Ok(())
            }
            Command::While { condition, body } => {
                f.write_str("while ")?;
                self.write_exp(f, condition)?;
                f.write_char(' ')?;
                self.write_command(f, body, depth)
            }
            Command::Block(block) => self.write_block(f, block, depth),
        }
    }

    fn write_list(&self, f: &mut Formatter, exps: &[Exp]) -> fmt::Result {
        for (i, exp) in exps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.write_exp(f, exp)?;
        }
        Ok(())
    }

    fn write_operand(&self, f: &mut Formatter, operand: &Exp, needs_parens: bool) -> fmt::Result {
        if needs_parens {
            f.write_char('(')?;
            self.write_exp(f, operand)?;
            f.write_char(')')
        } else {
            self.write_exp(f, operand)
        }
    }

    fn write_exp(&self, f: &mut Formatter, exp: &Exp) -> fmt::Result {
        match &exp.kind {
            ExpKind::Symbol(node) => f.write_str(self.text(node)),
            ExpKind::Binary(op, left, right) => {
                let prec = op.precedence();
                let left_parens = binary_prec(left).is_some_and(|p| p < prec);
                let right_parens = binary_prec(right).is_some_and(|p| p <= prec);
                self.write_operand(f, left, left_parens)?;
                write!(f, " {op} ")?;
                self.write_operand(f, right, right_parens)
            }
            ExpKind::VectorIndex(vector, index) => {
                write!(f, "{}[", self.text(vector))?;
                self.write_exp(f, index)?;
                f.write_char(']')
            }
            ExpKind::Call(function, args) => {
                write!(f, "{}(", self.text(function))?;
                self.write_list(f, args)?;
                f.write_char(')')
            }
            ExpKind::Read => f.write_str("read"),
        }
    }
}

fn binary_prec(exp: &Exp) -> Option<u64> {
    match exp.kind {
        ExpKind::Binary(op, ..) => Some(op.precedence()),
        _ => None,
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::LessThan => "<",
            Self::GreaterThan => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::IsEqual => "==",
            Self::IsNotEqual => "!=",
        };
        f.write_str(s)
    }
}

impl Display for Decompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for declaration in &self.ast.declarations {
            self.write_declaration(f, declaration)?;
        }
        Ok(())
    }
}
