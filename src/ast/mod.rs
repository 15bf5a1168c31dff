//! Typed syntax tree.
//!
//! Leaves never own symbols, they hold [`SymbolId`]s into the [`SymbolTable`](crate::symtab::SymbolTable).
//! Every leaf and expression also records the [`Scope`] it belongs to, filled once by
//! [`Ast::stamp_scopes`].

#[cfg(all(test, feature = "parser"))]
mod ast_tests;
mod decompile;

use crate::symtab::{DataType, Scope, SymbolId};

pub use decompile::Decompiled;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ast {
    pub declarations: Vec<Declaration>,
}

/// Leaf referring to a symbol.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SymbolNode {
    pub symbol: SymbolId,
    pub line: u64,
    pub scope: Scope,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Variable(VarDec),
    Vector(VecDec),
    Function(FunDec),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDec {
    pub var_type: DataType,
    pub name: SymbolNode,
    pub init: SymbolNode,
    /// Denominator of a `float x: n/d` initializer
    pub divisor: Option<SymbolNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VecDec {
    pub var_type: DataType,
    pub name: SymbolNode,
    pub size: SymbolNode,
    pub init: Option<Vec<SymbolNode>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunDec {
    pub return_type: DataType,
    pub name: SymbolNode,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub param_type: DataType,
    pub name: SymbolNode,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub commands: Vec<Command>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Assign {
        target: SymbolNode,
        value: Exp,
    },
    VectorAssign {
        target: SymbolNode,
        index: Exp,
        value: Exp,
    },
    Print(Vec<Exp>),
    Return(Exp),
    Goto(SymbolNode),
    Label(SymbolNode),
    If {
        condition: Exp,
        then: Box<Command>,
        els: Option<Box<Command>>,
    },
    While {
        condition: Exp,
        body: Box<Command>,
    },
    Block(Block),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    IsEqual,
    IsNotEqual,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Exp {
    pub kind: ExpKind,
    /// Evaluated type, [`DataType::Undefined`] until semantic analysis stamps it
    pub data_type: DataType,
    pub scope: Scope,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpKind {
    Symbol(SymbolNode),
    Binary(BinaryOp, Box<Exp>, Box<Exp>),
    VectorIndex(SymbolNode, Box<Exp>),
    Call(SymbolNode, Vec<Exp>),
    Read,
}

impl SymbolNode {
    pub fn new(symbol: SymbolId, line: u64) -> Self {
        Self {
            symbol,
            line,
            scope: Scope::Global,
        }
    }

    /// Rebind the leaf, used when a local shadows a global or an identifier gets resolved.
    pub fn set_symbol(&mut self, symbol: SymbolId) {
        self.symbol = symbol;
    }
}

impl BinaryOp {
    #[inline]
    pub fn is_comparison(self) -> bool {
        !self.is_arithmetic()
    }

    #[inline]
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub fn precedence(self) -> u64 {
        match self {
            Self::Mul | Self::Div => 50,
            Self::Add | Self::Sub => 45,
            _ => 30,
        }
    }
}

impl Exp {
    fn new(kind: ExpKind) -> Self {
        Self {
            kind,
            data_type: DataType::Undefined,
            scope: Scope::Global,
        }
    }

    pub fn symbol(node: SymbolNode) -> Self {
        Self::new(ExpKind::Symbol(node))
    }

    pub fn binary(op: BinaryOp, left: Box<Exp>, right: Box<Exp>) -> Self {
        Self::new(ExpKind::Binary(op, left, right))
    }

    pub fn vector_index(vector: SymbolNode, index: Box<Exp>) -> Self {
        Self::new(ExpKind::VectorIndex(vector, index))
    }

    pub fn call(function: SymbolNode, args: Vec<Exp>) -> Self {
        Self::new(ExpKind::Call(function, args))
    }

    pub fn read() -> Self {
        Self::new(ExpKind::Read)
    }

    pub fn set_evaluated_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    pub fn get_type(&self) -> DataType {
        self.data_type
    }

    /// Leaf of a bare symbol expression
    pub fn as_symbol(&self) -> Option<&SymbolNode> {
        match &self.kind {
            ExpKind::Symbol(node) => Some(node),
            _ => None,
        }
    }

    /// Visit every leaf in left-to-right order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SymbolNode)) {
        match &mut self.kind {
            ExpKind::Symbol(node) => f(node),
            ExpKind::Binary(_, left, right) => {
                left.for_each_leaf_mut(f);
                right.for_each_leaf_mut(f);
            }
            ExpKind::VectorIndex(vector, index) => {
                f(vector);
                index.for_each_leaf_mut(f);
            }
            ExpKind::Call(function, args) => {
                f(function);
                args.iter_mut().for_each(|arg| arg.for_each_leaf_mut(f));
            }
            ExpKind::Read => (),
        }
    }

    fn stamp_scope(&mut self, scope: Scope) {
        self.scope = scope;
        match &mut self.kind {
            ExpKind::Symbol(node) => node.scope = scope,
            ExpKind::Binary(_, left, right) => {
                left.stamp_scope(scope);
                right.stamp_scope(scope);
            }
            ExpKind::VectorIndex(vector, index) => {
                vector.scope = scope;
                index.stamp_scope(scope);
            }
            ExpKind::Call(function, args) => {
                function.scope = scope;
                args.iter_mut().for_each(|arg| arg.stamp_scope(scope));
            }
            ExpKind::Read => (),
        }
    }
}

impl Command {
    /// Visit every leaf in left-to-right order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SymbolNode)) {
        match self {
            Self::Assign { target, value } => {
                f(target);
                value.for_each_leaf_mut(f);
            }
            Self::VectorAssign {
                target,
                index,
                value,
            } => {
                f(target);
                index.for_each_leaf_mut(f);
                value.for_each_leaf_mut(f);
            }
            Self::Print(printables) => printables
                .iter_mut()
                .for_each(|printable| printable.for_each_leaf_mut(f)),
            Self::Return(exp) => exp.for_each_leaf_mut(f),
            Self::Goto(label) | Self::Label(label) => f(label),
            Self::If {
                condition,
                then,
                els,
            } => {
                condition.for_each_leaf_mut(f);
                then.for_each_leaf_mut(f);
                if let Some(els) = els {
                    els.for_each_leaf_mut(f);
                }
            }
            Self::While { condition, body } => {
                condition.for_each_leaf_mut(f);
                body.for_each_leaf_mut(f);
            }
            Self::Block(block) => block.for_each_leaf_mut(f),
        }
    }

    fn stamp_scope(&mut self, scope: Scope) {
        self.for_each_exp_mut(&mut |exp| exp.stamp_scope(scope));
        self.for_each_leaf_mut(&mut |leaf| leaf.scope = scope);
    }

    fn for_each_exp_mut(&mut self, f: &mut impl FnMut(&mut Exp)) {
        match self {
            Self::Assign { value, .. } | Self::Return(value) => f(value),
            Self::VectorAssign { index, value, .. } => {
                f(index);
                f(value);
            }
            Self::Print(printables) => printables.iter_mut().for_each(f),
            Self::Goto(_) | Self::Label(_) => (),
            Self::If {
                condition,
                then,
                els,
            } => {
                f(condition);
                then.for_each_exp_mut(f);
                if let Some(els) = els {
                    els.for_each_exp_mut(f);
                }
            }
            Self::While { condition, body } => {
                f(condition);
                body.for_each_exp_mut(f);
            }
            Self::Block(block) => block
                .commands
                .iter_mut()
                .for_each(|command| command.for_each_exp_mut(f)),
        }
    }
}

impl Block {
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SymbolNode)) {
        self.commands
            .iter_mut()
            .for_each(|command| command.for_each_leaf_mut(f));
    }
}

impl Declaration {
    /// Leaf naming the declared entity
    pub fn name(&self) -> &SymbolNode {
        match self {
            Self::Variable(VarDec { name, .. })
            | Self::Vector(VecDec { name, .. })
            | Self::Function(FunDec { name, .. }) => name,
        }
    }

    /// Visit every leaf in source order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SymbolNode)) {
        match self {
            Self::Variable(VarDec {
                name,
                init,
                divisor,
                ..
            }) => {
                f(name);
                f(init);
                if let Some(divisor) = divisor {
                    f(divisor);
                }
            }
            Self::Vector(VecDec {
                name, size, init, ..
            }) => {
                f(name);
                f(size);
                init.iter_mut().flatten().for_each(|value| f(value));
            }
            Self::Function(FunDec {
                name, params, body, ..
            }) => {
                f(name);
                params.iter_mut().for_each(|param| f(&mut param.name));
                body.for_each_leaf_mut(f);
            }
        }
    }
}

impl FunDec {
    /// Bind parameters and body to the scope of the function's current symbol.
    pub fn stamp_scopes(&mut self) {
        let scope = Scope::Function(self.name.symbol);
        self.params
            .iter_mut()
            .for_each(|param| param.name.scope = scope);
        self.body
            .commands
            .iter_mut()
            .for_each(|command| command.stamp_scope(scope));
    }
}

impl Ast {
    /// Assign owning scopes top-down: GLOBAL everywhere except the parameters and body of a
    /// function, which belong to that function's symbol.
    pub fn stamp_scopes(&mut self) {
        for declaration in &mut self.declarations {
            declaration.for_each_leaf_mut(&mut |leaf| leaf.scope = Scope::Global);
            if let Declaration::Function(fun) = declaration {
                fun.stamp_scopes();
            }
        }
    }

    /// Visit every leaf of the whole program in source order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SymbolNode)) {
        self.declarations
            .iter_mut()
            .for_each(|declaration| declaration.for_each_leaf_mut(f));
    }
}
