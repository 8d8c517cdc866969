//! Ordered top-level statement list of a module.

use swc_ecma_ast::{Module, ModuleItem, Stmt};

/// Read access to a module's top-level items plus an append primitive.
///
/// The pass only ever appends; existing items are never reordered or removed.
pub trait StatementList {
    /// The current top-level items, in source order.
    fn items(&self) -> &[ModuleItem];

    /// Appends a statement after every existing item.
    fn append(&mut self, stmt: Stmt);
}

impl StatementList for Module {
    fn items(&self) -> &[ModuleItem] {
        &self.body
    }

    fn append(&mut self, stmt: Stmt) {
        self.body.push(ModuleItem::Stmt(stmt));
    }
}
