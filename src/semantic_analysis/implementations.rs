use super::typing::{are_compatible, resulting_data_type};
use super::{Checker, SemanticError};
use crate::ast::*;
use crate::symtab::{DataType, Scope, SymbolId, SymbolKind};

impl Checker<'_> {
    /// Pass two: resolve and type-check every function body.
    pub(super) fn check_implementations(&mut self, ast: &mut Ast) -> usize {
        let mut errors = 0;
        for (index, declaration) in ast.declarations.iter_mut().enumerate() {
            let Declaration::Function(fundec) = declaration else {
                continue;
            };
            if self.skipped_functions.contains(&index) {
                continue;
            }
            let function = fundec.name.symbol;
            for command in &mut fundec.body.commands {
                errors += self.check_command(command, function);
            }
        }
        errors
    }

    fn check_compatible(
        &mut self,
        scope: Scope,
        context: impl FnOnce() -> String,
        expected: DataType,
        found: DataType,
    ) -> usize {
        // undefined only comes out of an expression that was already reported
        if found == DataType::Undefined || are_compatible(expected, found) {
            return 0;
        }
        let error = SemanticError::IncompatibleTypes {
            context: context(),
            expected,
            found,
        };
        self.report(scope, error)
    }

    fn check_condition(&mut self, condition: &mut Exp, scope: Scope) -> usize {
        let errors = self.check_exp(condition, scope);
        let found = condition.get_type();
        errors + self.check_compatible(scope, || "condition".into(), DataType::Bool, found)
    }

    fn check_index(&mut self, vector: SymbolId, index: &Exp, scope: Scope) -> usize {
        let found = index.get_type();
        if matches!(found, DataType::Int | DataType::Undefined) {
            return 0;
        }
        let name = self.name_of(vector);
        self.report(scope, SemanticError::IndexNotInt(name, found))
    }

    /// Resolve `leaf` and require its symbol to be of `kind`.
    fn resolve_kind(
        &mut self,
        leaf: &mut SymbolNode,
        accepts: impl Fn(SymbolKind) -> bool,
        mismatch: impl FnOnce(String, SymbolKind) -> SemanticError,
    ) -> Result<SymbolId, usize> {
        let scope = leaf.scope;
        let id = self.resolve(leaf)?;
        let kind = self.table[id].kind;
        if accepts(kind) {
            Ok(id)
        } else {
            let name = self.name_of(id);
            Err(self.report(scope, mismatch(name, kind)))
        }
    }

    fn check_command(&mut self, command: &mut Command, function: SymbolId) -> usize {
        let scope = Scope::Function(function);
        match command {
            Command::Assign { target, value } => {
                let is_variable = |k: SymbolKind| matches!(k, SymbolKind::Variable | SymbolKind::Parameter);
                let target = self.resolve_kind(target, is_variable, SemanticError::NotAVariable);
                let errors = self.check_exp(value, scope);
                match target {
                    Ok(id) => {
                        let expected = self.table[id].data_type;
                        let context = format!("assignment to '{}'", self.table[id].value);
                        errors + self.check_compatible(scope, || context, expected, value.get_type())
                    }
                    Err(e) => errors + e,
                }
            }
            Command::VectorAssign {
                target,
                index,
                value,
            } => {
                let is_vector = |k: SymbolKind| k == SymbolKind::Vector;
                let target = self.resolve_kind(target, is_vector, SemanticError::NotAVector);
                let mut errors = self.check_exp(index, scope);
                if let Ok(id) = target {
                    errors += self.check_index(id, index, scope);
                }
                errors += self.check_exp(value, scope);
                match target {
                    Ok(id) => {
                        let expected = self.table[id].data_type;
                        let context = format!("assignment to '{}[]'", self.table[id].value);
                        errors + self.check_compatible(scope, || context, expected, value.get_type())
                    }
                    Err(e) => errors + e,
                }
            }
            Command::Print(printables) => printables
                .iter_mut()
                .map(|printable| self.check_printable(printable, scope))
                .sum(),
            Command::Return(exp) => {
                let errors = self.check_exp(exp, scope);
                let expected = self.table[function].data_type;
                let context = format!("return from '{}'", self.table[function].value);
                errors + self.check_compatible(scope, || context, expected, exp.get_type())
            }
            Command::Goto(label) => self.check_goto(label, scope),
            Command::Label(_) => 0,
            Command::If {
                condition,
                then,
                els,
            } => {
                let mut errors = self.check_condition(condition, scope);
                errors += self.check_command(then, function);
                if let Some(els) = els {
                    errors += self.check_command(els, function);
                }
                errors
            }
            Command::While { condition, body } => {
                let errors = self.check_condition(condition, scope);
                errors + self.check_command(body, function)
            }
            Command::Block(block) => block
                .commands
                .iter_mut()
                .map(|command| self.check_command(command, function))
                .sum(),
        }
    }

    fn check_printable(&mut self, printable: &mut Exp, scope: Scope) -> usize {
        if let Some(leaf) = printable.as_symbol() {
            if self.table[leaf.symbol].kind == SymbolKind::StringLiteral {
                printable.set_evaluated_type(DataType::String);
                return 0;
            }
        }
        self.check_exp(printable, scope)
    }

    fn check_goto(&mut self, label: &mut SymbolNode, scope: Scope) -> usize {
        let name = self.name_of(label.symbol);
        let found = self
            .table
            .get(&name, scope)
            .filter(|&id| self.table[id].kind == SymbolKind::Label);
        match found {
            Some(id) => {
                label.set_symbol(id);
                0
            }
            None => self.report(scope, SemanticError::UndefinedLabel(name)),
        }
    }

    /// Type `exp` bottom-up, storing the evaluated type on every node.
    ///
    /// A node whose type can not be derived gets [`DataType::Undefined`], which is only ever
    /// produced together with a reported error.
    fn check_exp(&mut self, exp: &mut Exp, scope: Scope) -> usize {
        let (data_type, errors) = match &mut exp.kind {
            ExpKind::Symbol(leaf) => self.evaluate_symbol(leaf),
            ExpKind::Read => (DataType::Char, 0),
            ExpKind::Binary(op, left, right) => {
                let errors = self.check_exp(left, scope) + self.check_exp(right, scope);
                let (data_type, e) = self.evaluate_binary(*op, left.get_type(), right.get_type(), scope);
                (data_type, errors + e)
            }
            ExpKind::VectorIndex(vector, index) => {
                let is_vector = |k: SymbolKind| k == SymbolKind::Vector;
                let resolved = self.resolve_kind(vector, is_vector, SemanticError::NotAVector);
                let errors = self.check_exp(index, scope);
                match resolved {
                    Ok(id) => {
                        let e = self.check_index(id, index, scope);
                        (self.table[id].data_type, errors + e)
                    }
                    Err(e) => (DataType::Undefined, errors + e),
                }
            }
            ExpKind::Call(function, args) => {
                let is_function = |k: SymbolKind| k == SymbolKind::Function;
                let resolved = self.resolve_kind(function, is_function, SemanticError::NotAFunction);
                let errors: usize = args.iter_mut().map(|arg| self.check_exp(arg, scope)).sum();
                match resolved {
                    Ok(id) => {
                        let e = self.check_call_arguments(id, args, scope);
                        (self.table[id].data_type, errors + e)
                    }
                    Err(e) => (DataType::Undefined, errors + e),
                }
            }
        };
        exp.set_evaluated_type(data_type);
        errors
    }

    fn evaluate_symbol(&mut self, leaf: &mut SymbolNode) -> (DataType, usize) {
        match self.resolve_kind(leaf, SymbolKind::is_scalar, SemanticError::NotAScalar) {
            Ok(id) => {
                let symbol = &self.table[id];
                let data_type = match symbol.data_type {
                    DataType::Undefined => symbol.literal_type().unwrap_or(DataType::Undefined),
                    data_type => data_type,
                };
                (data_type, 0)
            }
            Err(errors) => (DataType::Undefined, errors),
        }
    }

    fn evaluate_binary(
        &mut self,
        op: BinaryOp,
        left: DataType,
        right: DataType,
        scope: Scope,
    ) -> (DataType, usize) {
        if left == DataType::Undefined || right == DataType::Undefined {
            return (DataType::Undefined, 0);
        }
        if !left.is_numeric() || !right.is_numeric() {
            let error = SemanticError::IncompatibleOperands { op, left, right };
            return (DataType::Undefined, self.report(scope, error));
        }
        if op.is_comparison() {
            (DataType::Bool, 0)
        } else {
            (resulting_data_type(left, right), 0)
        }
    }

    fn check_call_arguments(&mut self, function: SymbolId, args: &[Exp], scope: Scope) -> usize {
        let parameters = self.table[function].parameters.clone();
        let name = self.name_of(function);
        let (expected, got) = (parameters.len(), args.len());
        if got < expected {
            let error = SemanticError::TooFewArguments {
                function: name,
                expected,
                got,
            };
            return self.report(scope, error);
        }
        if got > expected {
            let error = SemanticError::TooManyArguments {
                function: name,
                expected,
                got,
            };
            return self.report(scope, error);
        }

        let mut errors = 0;
        for (position, (arg, parameter)) in args.iter().zip(parameters).enumerate() {
            let expected = self.table[parameter].data_type;
            let context = || format!("argument {} of '{name}'", position + 1);
            errors += self.check_compatible(scope, context, expected, arg.get_type());
        }
        errors
    }
}
