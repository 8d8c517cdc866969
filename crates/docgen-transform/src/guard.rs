//! Detection of modules that were already instrumented.

use swc_ecma_ast::{
    AssignExpr, AssignTarget, Expr, ExprStmt, MemberExpr, MemberProp, ModuleItem,
    SimpleAssignTarget, Stmt,
};

/// Property that carries the documentation literal on a component.
pub const DOCGEN_PROPERTY: &str = "__docgenInfo";

/// Returns true if any top-level statement assigns to `<expr>.__docgenInfo`.
pub fn already_instrumented(items: &[ModuleItem]) -> bool {
    items.iter().any(|item| {
        let ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) = item else {
            return false;
        };
        let Expr::Assign(AssignExpr { left, .. }) = expr.as_ref() else {
            return false;
        };
        let AssignTarget::Simple(SimpleAssignTarget::Member(MemberExpr { prop, .. })) = left
        else {
            return false;
        };
        matches!(prop, MemberProp::Ident(ident) if ident.sym.as_ref() == DOCGEN_PROPERTY)
    })
}
