//! Component shape classification.
//!
//! Four idioms are recognised:
//! - `class Foo extends React.Component {}` (class component)
//! - `function Foo() { return <div /> }` / `const Foo = () => <div />` (function component)
//! - `const Foo = React.createClass({...})` / `createReactClass({...})` (factory call)
//! - `const Foo = React.createElement(...)` (element assignment)

use smol_str::SmolStr;
use swc_common::Span;
use swc_ecma_ast::{ArrowExpr, CallExpr, Callee, Class, Expr, Function, MemberProp};

use crate::predicates::{ComponentPredicates, FunctionLike};

/// The idiom a component definition is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    ClassComponent,
    FunctionComponent,
    FactoryCallComponent,
    ElementAssignmentComponent,
}

/// A recognised factory method on the callee of a call expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryCallee {
    /// `<Ns>.createClass(...)`, `createClass(...)` or `createReactClass(...)`.
    CreateClass,
    /// `<Ns>.createElement(...)`.
    CreateElement,
}

/// Matches a callee against the factory methods, ignoring case.
///
/// Only direct identifiers and property names are compared; import aliases
/// are not followed.
pub fn match_factory_callee(callee: &Callee) -> Option<FactoryCallee> {
    let Callee::Expr(callee) = callee else {
        return None;
    };
    match callee.as_ref() {
        Expr::Ident(ident) => {
            let name = ident.sym.as_str();
            (name.eq_ignore_ascii_case("createReactClass")
                || name.eq_ignore_ascii_case("createClass"))
            .then_some(FactoryCallee::CreateClass)
        }
        Expr::Member(member) => {
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let name = prop.sym.as_str();
            if name.eq_ignore_ascii_case("createClass") {
                Some(FactoryCallee::CreateClass)
            } else if name.eq_ignore_ascii_case("createElement") {
                Some(FactoryCallee::CreateElement)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A syntax node that may define a component.
#[derive(Debug, Clone, Copy)]
pub enum CandidateNode<'a> {
    Class(&'a Class),
    Function(&'a Function),
    Arrow(&'a ArrowExpr),
    Call(&'a CallExpr),
}

/// How the node is bound to a name in its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<'a> {
    /// The node's own identifier (`class Foo`, `function Foo`).
    Declared(&'a str),
    /// The identifier of the variable declarator it initialises.
    Declarator(&'a str),
    /// No statically resolvable name.
    Anonymous,
}

/// A component definition found in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub shape: ShapeKind,
    pub bound_name: SmolStr,
    /// Whether the definition's own statement is an export declaration.
    pub directly_exported: bool,
    pub span: Span,
}

/// Tags nodes with a [`ShapeKind`] using the supplied predicates.
pub struct ComponentClassifier<'p, P: ?Sized> {
    predicates: &'p P,
}

impl<'p, P: ComponentPredicates + ?Sized> ComponentClassifier<'p, P> {
    pub fn new(predicates: &'p P) -> Self {
        Self { predicates }
    }

    /// Classifies `node`, returning its shape and bound name.
    ///
    /// Returns `None` when the node is not a component or has no name to
    /// attach metadata to.
    pub fn classify(
        &self,
        node: CandidateNode<'_>,
        binding: Binding<'_>,
    ) -> Option<(ShapeKind, SmolStr)> {
        match node {
            CandidateNode::Class(class) => {
                let name = bound_name(binding)?;
                self.predicates
                    .is_component_class(class)
                    .then(|| (ShapeKind::ClassComponent, name))
            }
            CandidateNode::Function(function) => {
                let name = bound_name(binding)?;
                self.predicates
                    .is_stateless_component(FunctionLike::Function(function))
                    .then(|| (ShapeKind::FunctionComponent, name))
            }
            CandidateNode::Arrow(arrow) => {
                let name = bound_name(binding)?;
                self.predicates
                    .is_stateless_component(FunctionLike::Arrow(arrow))
                    .then(|| (ShapeKind::FunctionComponent, name))
            }
            CandidateNode::Call(call) => {
                // Factory results only have a name when assigned to a variable.
                let Binding::Declarator(name) = binding else {
                    return None;
                };
                let shape = match match_factory_callee(&call.callee)? {
                    FactoryCallee::CreateClass => ShapeKind::FactoryCallComponent,
                    FactoryCallee::CreateElement => ShapeKind::ElementAssignmentComponent,
                };
                Some((shape, SmolStr::new(name)))
            }
        }
    }
}

fn bound_name(binding: Binding<'_>) -> Option<SmolStr> {
    match binding {
        Binding::Declared(name) | Binding::Declarator(name) => Some(SmolStr::new(name)),
        Binding::Anonymous => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use crate::predicates::ReactHeuristics;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{Decl, ModuleItem, Pat, Stmt};

    /// Predicates that accept everything, to isolate binding rules.
    struct AcceptAll;

    impl ComponentPredicates for AcceptAll {
        fn is_component_class(&self, _: &Class) -> bool {
            true
        }

        fn is_stateless_component(&self, _: FunctionLike<'_>) -> bool {
            true
        }
    }

    fn init_call(source: &str) -> (String, CallExpr) {
        let module = parse_module(source, "Test.jsx").unwrap();
        for item in module.body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item {
                let decl = var.decls.into_iter().next().unwrap();
                let Pat::Ident(binding) = &decl.name else {
                    continue;
                };
                let name = binding.id.sym.to_string();
                if let Some(Expr::Call(call)) = decl.init.map(|init| *init) {
                    return (name, call);
                }
            }
        }
        panic!("no call initialiser in {source}");
    }

    fn classify_call(source: &str) -> Option<ShapeKind> {
        let (name, call) = init_call(source);
        ComponentClassifier::new(&ReactHeuristics)
            .classify(CandidateNode::Call(&call), Binding::Declarator(&name))
            .map(|(shape, _)| shape)
    }

    #[test]
    fn test_factory_callees() {
        assert_eq!(
            classify_call("const Foo = React.createClass({ render() {} });"),
            Some(ShapeKind::FactoryCallComponent)
        );
        assert_eq!(
            classify_call("const Foo = createReactClass({});"),
            Some(ShapeKind::FactoryCallComponent)
        );
        assert_eq!(
            classify_call("const Foo = React.createElement('div');"),
            Some(ShapeKind::ElementAssignmentComponent)
        );
        assert_eq!(classify_call("const Foo = React.cloneElement(x);"), None);
    }

    #[test]
    fn test_callee_match_ignores_case() {
        assert_eq!(
            classify_call("const Foo = react.CREATECLASS({});"),
            Some(ShapeKind::FactoryCallComponent)
        );
        assert_eq!(
            classify_call("const Foo = CreateReactClass({});"),
            Some(ShapeKind::FactoryCallComponent)
        );
        assert_eq!(
            classify_call("const Foo = h.createelement('div');"),
            Some(ShapeKind::ElementAssignmentComponent)
        );
    }

    #[test]
    fn test_bare_create_element_is_not_matched() {
        assert_eq!(classify_call("const Foo = createElement('div');"), None);
    }

    #[test]
    fn test_factory_call_needs_declarator() {
        let (_, call) = init_call("const Foo = React.createClass({});");
        let classifier = ComponentClassifier::new(&AcceptAll);
        assert_eq!(
            classifier.classify(CandidateNode::Call(&call), Binding::Anonymous),
            None
        );
        assert_eq!(
            classifier.classify(CandidateNode::Call(&call), Binding::Declared("Foo")),
            None
        );
    }

    #[test]
    fn test_unnamed_class_is_skipped() {
        let module = parse_module("class Foo {}", "Test.jsx").unwrap();
        let ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) = &module.body[0] else {
            panic!("expected class");
        };
        let classifier = ComponentClassifier::new(&AcceptAll);
        assert_eq!(
            classifier.classify(CandidateNode::Class(&decl.class), Binding::Anonymous),
            None
        );
        assert_eq!(
            classifier.classify(CandidateNode::Class(&decl.class), Binding::Declared("Foo")),
            Some((ShapeKind::ClassComponent, SmolStr::new("Foo")))
        );
    }

    #[test]
    fn test_predicates_gate_classes_and_functions() {
        let module = parse_module(
            "class Plain {}\nfunction helper() { return 1; }",
            "Test.jsx",
        )
        .unwrap();
        let classifier = ComponentClassifier::new(&ReactHeuristics);
        let ModuleItem::Stmt(Stmt::Decl(Decl::Class(class))) = &module.body[0] else {
            panic!("expected class");
        };
        let ModuleItem::Stmt(Stmt::Decl(Decl::Fn(function))) = &module.body[1] else {
            panic!("expected function");
        };
        assert_eq!(
            classifier.classify(CandidateNode::Class(&class.class), Binding::Declared("Plain")),
            None
        );
        assert_eq!(
            classifier.classify(
                CandidateNode::Function(&function.function),
                Binding::Declared("helper")
            ),
            None
        );
    }
}
