//! AST to pattern translation entrypoints.

mod from_ast;

use std::collections::HashMap;

use crate::ast::Ast;
use crate::pattern::error::PatternError;
use crate::pattern::patt::Pattern;

/// Read-only map from rule name to its previously compiled pattern.
///
/// References to names in the table inline the compiled pattern; anything
/// else lowers to a `Call` resolved later by the link pass.
pub type SymbolTable = HashMap<String, Pattern>;

/// Stateless translator over one expression tree.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Translator<'a> {
    /// Creates a translator consulting the given symbol table.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Returns the symbol table in use.
    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    /// Translates one expression into a compiled pattern.
    pub fn translate(&self, expr: &Ast) -> Result<Pattern, PatternError> {
        from_ast::translate_expr(self, expr)
    }
}
