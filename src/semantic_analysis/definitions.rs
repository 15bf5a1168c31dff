use super::typing::{are_compatible, set_literal_type};
use super::{Checker, SemanticError};
use crate::ast::*;
use crate::symtab::{DataType, Scope, SymbolKind};

impl Checker<'_> {
    /// Pass one: give every declared name its symbol.
    pub(super) fn collect_definitions(&mut self, ast: &mut Ast) -> usize {
        let table = &mut *self.table;
        ast.for_each_leaf_mut(&mut |leaf| set_literal_type(table, leaf));

        let mut errors = 0;
        for (index, declaration) in ast.declarations.iter_mut().enumerate() {
            errors += match declaration {
                Declaration::Variable(vardec) => self.check_variable_declaration(vardec),
                Declaration::Vector(vecdec) => self.check_vector_declaration(vecdec),
                Declaration::Function(fundec) => self.check_function_declaration(index, fundec),
            };
        }
        errors
    }

    /// Bind the declared name in `leaf` to a symbol of `kind` in `scope`.
    ///
    /// An unresolved leaf symbol is promoted in place. A leaf already bound elsewhere gets a fresh
    /// symbol in `scope`. Shadowing is only allowed against GLOBAL: a name already bound in
    /// another function is a redeclaration, labels excepted.
    fn declare(
        &mut self,
        leaf: &mut SymbolNode,
        kind: SymbolKind,
        data_type: DataType,
        scope: Scope,
    ) -> usize {
        let name = self.name_of(leaf.symbol);
        let existing = self
            .table
            .get(&name, scope)
            .filter(|&id| self.table[id].kind.is_resolved());
        if let Some(existing) = existing {
            return self.redeclaration(scope, existing);
        }

        let current = &self.table[leaf.symbol];
        if !current.kind.is_resolved() {
            self.table
                .promote(leaf.symbol, kind, data_type, scope, leaf.line);
            return 0;
        }

        let mut errors = 0;
        let across_functions = !current.scope.is_global() && !scope.is_global();
        if across_functions && current.kind != SymbolKind::Label && kind != SymbolKind::Label {
            // reported, but the name is still bound locally
            errors += self.redeclaration(scope, leaf.symbol);
        }

        let id = self.table.add_with_scope(&name, kind, leaf.line, scope);
        self.table.promote(id, kind, data_type, scope, leaf.line);
        leaf.set_symbol(id);
        errors
    }

    fn check_initializer(&mut self, name: &SymbolNode, value: &SymbolNode, expected: DataType) -> usize {
        let found = self.table[value.symbol].data_type;
        if are_compatible(expected, found) {
            return 0;
        }
        let context = format!("initializer of '{}'", self.name_of(name.symbol));
        let error = SemanticError::IncompatibleTypes {
            context,
            expected,
            found,
        };
        self.report(Scope::Global, error)
    }

    fn check_variable_declaration(&mut self, vardec: &mut VarDec) -> usize {
        let VarDec {
            var_type,
            name,
            init,
            divisor,
        } = vardec;
        let mut errors = self.declare(name, SymbolKind::Variable, *var_type, Scope::Global);
        errors += self.check_initializer(name, init, *var_type);
        if let Some(divisor) = divisor {
            errors += self.check_initializer(name, divisor, DataType::Int);
        }
        errors
    }

    fn check_vector_declaration(&mut self, vecdec: &mut VecDec) -> usize {
        let VecDec {
            var_type,
            name,
            size,
            init,
        } = vecdec;
        let mut errors = self.declare(name, SymbolKind::Vector, *var_type, Scope::Global);
        let Some(values) = init else {
            return errors;
        };

        let declared_size = self.table[size.symbol].literal_value().unwrap_or(0);
        let declared_size = usize::try_from(declared_size).unwrap_or(0);
        if values.len() != declared_size {
            let error = SemanticError::InitializerSizeMismatch {
                name: self.name_of(name.symbol),
                size: declared_size,
                got: values.len(),
            };
            errors += self.report(Scope::Global, error);
        }
        for value in values.iter() {
            errors += self.check_initializer(name, value, *var_type);
        }
        errors
    }

    fn check_function_declaration(&mut self, index: usize, fundec: &mut FunDec) -> usize {
        let before = fundec.name.symbol;
        let errors = self.declare(
            &mut fundec.name,
            SymbolKind::Function,
            fundec.return_type,
            Scope::Global,
        );
        if errors > 0 {
            self.skipped_functions.insert(index);
            return errors;
        }
        if fundec.name.symbol != before {
            fundec.stamp_scopes();
        }

        let function = fundec.name.symbol;
        let scope = Scope::Function(function);
        let mut errors = 0;
        for Param { param_type, name } in &mut fundec.params {
            errors += self.declare(name, SymbolKind::Parameter, *param_type, scope);
            self.table[function].parameters.push(name.symbol);
        }
        for command in &mut fundec.body.commands {
            errors += self.declare_labels(command, scope);
        }
        errors
    }

    fn declare_labels(&mut self, command: &mut Command, scope: Scope) -> usize {
        match command {
            Command::Label(label) => self.declare(label, SymbolKind::Label, DataType::Undefined, scope),
            Command::If { then, els, .. } => {
                let mut errors = self.declare_labels(then, scope);
                if let Some(els) = els {
                    errors += self.declare_labels(els, scope);
                }
                errors
            }
            Command::While { body, .. } => self.declare_labels(body, scope),
            Command::Block(block) => block
                .commands
                .iter_mut()
                .map(|command| self.declare_labels(command, scope))
                .sum(),
            _ => 0,
        }
    }
}
