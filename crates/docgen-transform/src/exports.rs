//! Export reachability of component definitions.
//!
//! A definition is reachable when any of these hold:
//! - its own statement is an export (`export class Foo`, `export const Foo = ...`)
//! - `export { Foo }` / `export { Foo as Bar }` appears, or an export
//!   declaration declares `Foo`
//! - the default export resolves to `Foo`, unwrapping nested calls through
//!   their first argument (`export default connect(a)(withRouter(Foo))`)
//! - `module.exports = Foo`
//!
//! Re-exports with a `from` clause never refer to local bindings.

use swc_ecma_ast::{
    AssignExpr, AssignOp, AssignTarget, Callee, Decl, DefaultDecl, ExportSpecifier, Expr,
    ExprStmt, MemberProp, ModuleDecl, ModuleExportName, ModuleItem, Pat, SimpleAssignTarget,
    Stmt,
};

use crate::classify::Candidate;

/// How many nested calls a default export is unwrapped through.
pub const MAX_UNWRAP_DEPTH: usize = 32;

/// Returns true if `candidate` is part of the module's export surface.
pub fn is_exported(candidate: &Candidate, items: &[ModuleItem]) -> bool {
    if candidate.directly_exported {
        return true;
    }
    let name = candidate.bound_name.as_str();
    items.iter().any(|item| exports_name(item, name))
}

fn exports_name(item: &ModuleItem, name: &str) -> bool {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
            // Handle: export { Foo }, export { Foo as Bar }
            if named.src.is_some() {
                return false;
            }
            named.specifiers.iter().any(|spec| match spec {
                ExportSpecifier::Named(named) => {
                    !named.is_type_only && module_export_name_is(&named.orig, name)
                }
                _ => false,
            })
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export_decl)) => {
            declares_name(&export_decl.decl, name)
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(default_decl)) => {
            match &default_decl.decl {
                DefaultDecl::Class(class) => class
                    .ident
                    .as_ref()
                    .is_some_and(|ident| ident.sym.as_str() == name),
                DefaultDecl::Fn(function) => function
                    .ident
                    .as_ref()
                    .is_some_and(|ident| ident.sym.as_str() == name),
                DefaultDecl::TsInterfaceDecl(_) => false,
            }
        }
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(default_expr)) => {
            resolve_exported_ident(&default_expr.expr, 0) == Some(name)
        }
        ModuleItem::Stmt(Stmt::Expr(ExprStmt { expr, .. })) => {
            module_exports_target(expr) == Some(name)
        }
        _ => false,
    }
}

/// Whether an export declaration declares `name`.
fn declares_name(decl: &Decl, name: &str) -> bool {
    match decl {
        Decl::Class(class_decl) => class_decl.ident.sym.as_str() == name,
        Decl::Fn(fn_decl) => fn_decl.ident.sym.as_str() == name,
        Decl::Var(var_decl) => var_decl
            .decls
            .iter()
            .any(|decl| binding_name(&decl.name) == Some(name)),
        // Type-only declarations never carry a runtime component
        _ => false,
    }
}

/// Follows a default export down to the identifier it exports.
///
/// Calls are unwrapped through their first argument, so HOC chains like
/// `withStyles(styles)(Foo)` resolve to `Foo`. Gives up past
/// [`MAX_UNWRAP_DEPTH`] levels.
pub fn resolve_exported_ident(expr: &Expr, depth: usize) -> Option<&str> {
    if depth > MAX_UNWRAP_DEPTH {
        return None;
    }
    match expr {
        Expr::Ident(ident) => Some(ident.sym.as_str()),
        Expr::Paren(paren) => resolve_exported_ident(&paren.expr, depth + 1),
        Expr::Call(call) => {
            if !matches!(call.callee, Callee::Expr(_)) {
                return None;
            }
            let first = call.args.first()?;
            if first.spread.is_some() {
                return None;
            }
            resolve_exported_ident(&first.expr, depth + 1)
        }
        _ => None,
    }
}

/// Returns `Foo` for a `module.exports = Foo` expression.
fn module_exports_target(expr: &Expr) -> Option<&str> {
    let Expr::Assign(AssignExpr {
        op: AssignOp::Assign,
        left: AssignTarget::Simple(SimpleAssignTarget::Member(member)),
        right,
        ..
    }) = expr
    else {
        return None;
    };
    let Expr::Ident(object) = member.obj.as_ref() else {
        return None;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    if object.sym.as_str() != "module" || prop.sym.as_str() != "exports" {
        return None;
    }
    match right.as_ref() {
        Expr::Ident(ident) => Some(ident.sym.as_str()),
        _ => None,
    }
}

/// Only simple identifier patterns bind a component name.
fn binding_name(pat: &Pat) -> Option<&str> {
    match pat {
        Pat::Ident(ident) => Some(ident.id.sym.as_str()),
        _ => None,
    }
}

fn module_export_name_is(export_name: &ModuleExportName, name: &str) -> bool {
    match export_name {
        ModuleExportName::Ident(ident) => ident.sym.as_str() == name,
        ModuleExportName::Str(_) => false,
    }
}
