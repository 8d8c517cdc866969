//! Component predicates.
//!
//! Whether a class or function "is a component" is decided outside the
//! classifier, through [`ComponentPredicates`]. [`ReactHeuristics`] is the
//! default and mirrors react-docgen's own checks.

use swc_ecma_ast::{
    ArrowExpr, BinaryOp, BlockStmtOrExpr, Class, ClassMember, Expr, Function, MemberProp,
    PropName, ReturnStmt,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::classify::{match_factory_callee, FactoryCallee};

/// A function-shaped node: declaration/expression body or arrow.
#[derive(Debug, Clone, Copy)]
pub enum FunctionLike<'a> {
    Function(&'a Function),
    Arrow(&'a ArrowExpr),
}

/// Pure, side-effect-free component tests.
pub trait ComponentPredicates {
    /// Whether `class` defines a component (render method or component base).
    fn is_component_class(&self, class: &Class) -> bool;

    /// Whether `function` is a stateless function component.
    fn is_stateless_component(&self, function: FunctionLike<'_>) -> bool;
}

/// react-docgen style heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactHeuristics;

const COMPONENT_BASES: [&str; 2] = ["Component", "PureComponent"];

impl ComponentPredicates for ReactHeuristics {
    fn is_component_class(&self, class: &Class) -> bool {
        let has_render = class.body.iter().any(|member| match member {
            ClassMember::Method(method) => {
                matches!(&method.key, PropName::Ident(ident) if ident.sym.as_ref() == "render")
            }
            _ => false,
        });
        if has_render {
            return true;
        }

        match class.super_class.as_deref() {
            Some(Expr::Ident(ident)) => COMPONENT_BASES.contains(&ident.sym.as_str()),
            Some(Expr::Member(member)) => match &member.prop {
                MemberProp::Ident(prop) => COMPONENT_BASES.contains(&prop.sym.as_str()),
                _ => false,
            },
            _ => false,
        }
    }

    fn is_stateless_component(&self, function: FunctionLike<'_>) -> bool {
        match function {
            FunctionLike::Arrow(arrow) => match arrow.body.as_ref() {
                BlockStmtOrExpr::Expr(expr) => returns_element(expr),
                BlockStmtOrExpr::BlockStmt(block) => {
                    let mut finder = ReturnFinder::default();
                    block.visit_children_with(&mut finder);
                    finder.found
                }
            },
            FunctionLike::Function(function) => {
                let Some(body) = &function.body else {
                    return false;
                };
                let mut finder = ReturnFinder::default();
                body.visit_children_with(&mut finder);
                finder.found
            }
        }
    }
}

/// Whether `expr` evaluates to a UI element on some path.
fn returns_element(expr: &Expr) -> bool {
    match expr {
        Expr::JSXElement(_) | Expr::JSXFragment(_) => true,
        Expr::Paren(paren) => returns_element(&paren.expr),
        Expr::Cond(cond) => returns_element(&cond.cons) || returns_element(&cond.alt),
        Expr::Bin(bin) => {
            matches!(
                bin.op,
                BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing
            ) && (returns_element(&bin.left) || returns_element(&bin.right))
        }
        Expr::Seq(seq) => seq.exprs.last().is_some_and(|last| returns_element(last)),
        Expr::Call(call) => {
            matches!(match_factory_callee(&call.callee), Some(FactoryCallee::CreateElement))
        }
        _ => false,
    }
}

/// Looks for an element-returning `return` in one function body.
#[derive(Default)]
struct ReturnFinder {
    found: bool,
}

impl Visit for ReturnFinder {
    fn visit_return_stmt(&mut self, stmt: &ReturnStmt) {
        if let Some(arg) = &stmt.arg {
            self.found |= returns_element(arg);
        }
    }

    // Returns inside nested functions belong to those functions.
    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}
}
