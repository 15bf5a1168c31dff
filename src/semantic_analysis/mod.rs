//! Two-pass semantic analysis.
//!
//! Pass one ([`definitions`]) binds every declaration to a symbol of the right scope, pass two
//! ([`implementations`]) resolves identifier uses inside function bodies and type-checks them.
//! Checks never stop at the first problem: each returns how many errors it reported and the
//! counts are summed, while every individual [`Diagnostic`] goes straight to the sink.

mod definitions;
mod diagnostics;
mod implementations;
mod semanalysis_error;
mod typing;

use crate::ast::{Ast, SymbolNode};
use crate::symtab::{Scope, SymbolId, SymbolTable};
use std::collections::HashSet;

pub use diagnostics::{Diagnostic, DiagnosticSink, WriterSink};
pub use semanalysis_error::{Result, SemAnalysisError, SemanticError};
pub use typing::{are_compatible, resulting_data_type, set_literal_type};

struct Checker<'a> {
    table: &'a mut SymbolTable,
    sink: &'a mut dyn DiagnosticSink,
    /// Functions whose name was a redeclaration, left out of body checking
    skipped_functions: HashSet<usize>,
}

impl<'a> Checker<'a> {
    fn new(table: &'a mut SymbolTable, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            table,
            sink,
            skipped_functions: HashSet::new(),
        }
    }

    fn report(&mut self, scope: Scope, error: SemanticError) -> usize {
        let scope = self.table.scope_name(scope).to_owned();
        self.sink.report(Diagnostic { scope, error });
        1
    }

    fn name_of(&self, id: SymbolId) -> String {
        self.table[id].value.clone()
    }

    fn redeclaration(&mut self, scope: Scope, original: SymbolId) -> usize {
        let symbol = &self.table[original];
        let error = SemanticError::Redeclaration {
            name: symbol.value.clone(),
            line: symbol.line,
            kind: symbol.kind,
            data_type: symbol.data_type,
        };
        self.report(scope, error)
    }

    /// Bind a leaf to a resolved symbol visible from `scope`, the function's own scope first,
    /// then GLOBAL. Literals are resolved already.
    /// Bind `leaf` to the declaration visible from the scope it was stamped with.
    fn resolve(&mut self, leaf: &mut SymbolNode) -> std::result::Result<SymbolId, usize> {
        let scope = leaf.scope;
        let symbol = &self.table[leaf.symbol];
        if symbol.kind.is_literal() {
            return Ok(leaf.symbol);
        }
        let name = symbol.value.clone();
        let resolved = |id: &SymbolId| self.table[*id].kind.is_resolved();
        let found = self
            .table
            .get(&name, scope)
            .filter(resolved)
            .or_else(|| self.table.get(&name, Scope::Global).filter(resolved));

        match found {
            Some(id) => {
                leaf.set_symbol(id);
                Ok(id)
            }
            None => Err(self.report(scope, SemanticError::Undefined(name))),
        }
    }
}

/// Run both passes over `ast`, returning the number of semantic errors found.
///
/// `ast` and `table` are annotated in place: declarations get their kind, type and scope,
/// identifier leaves are rebound to the symbols they refer to and expressions get their
/// evaluated types.
pub fn check_semantic_errors(
    ast: &mut Ast,
    table: &mut SymbolTable,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let mut checker = Checker::new(table, sink);
    let errors = checker.collect_definitions(ast);
    errors + checker.check_implementations(ast)
}

/// [`check_semantic_errors`], failing when anything was reported.
pub fn validate(ast: &mut Ast, table: &mut SymbolTable, sink: &mut dyn DiagnosticSink) -> Result<()> {
    match check_semantic_errors(ast, table, sink) {
        0 => Ok(()),
        errors => Err(SemAnalysisError { errors }),
    }
}
