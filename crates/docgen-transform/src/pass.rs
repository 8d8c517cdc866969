//! The docgen instrumentation pass.
//!
//! For one module the pass:
//! 1. collects component candidates in source order
//! 2. keeps those reachable from the export surface
//! 3. stops if the module already carries `__docgenInfo` assignments
//! 4. extracts documentation records from the module source
//! 5. appends one assignment (plus optional registry entry) per record
//!
//! Nothing in here returns an error: every failure leaves the module as it
//! was and is reported through [`PassOutcome`].

use camino::Utf8Path;
use smol_str::SmolStr;
use swc_common::Span;
use swc_ecma_ast::{
    ArrowExpr, CallExpr, ClassDecl, ClassExpr, Decl, Expr, ExportDecl, ExportDefaultDecl, FnDecl,
    FnExpr, Module, Pat, TsModuleDecl, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::body::StatementList;
use crate::classify::{Binding, Candidate, CandidateNode, ComponentClassifier};
use crate::config::PassOptions;
use crate::emit::{module_path, InstrumentationEmitter};
use crate::error::ParseError;
use crate::exports::is_exported;
use crate::extract::{DocExtraction, DocExtractor};
use crate::guard::already_instrumented;
use crate::parse::parse_module;
use crate::predicates::{ComponentPredicates, ReactHeuristics};

/// Why a module was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No node matched a component shape with a resolvable name.
    NoComponents,
    /// Components exist but none is reachable from the exports.
    NotExported,
    /// The module already has `__docgenInfo` assignments.
    AlreadyInstrumented,
    /// The extractor failed or returned nothing.
    ExtractionFailed,
    /// Records were extracted but none could be attached to a name.
    NoRecords,
}

/// Result of running the pass over one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Instrumented { statements: usize },
    Skipped(SkipReason),
}

/// Attaches extracted documentation to exported components.
pub struct DocgenPass<E, P = ReactHeuristics> {
    options: PassOptions,
    extractor: E,
    predicates: P,
}

impl<E: DocExtractor> DocgenPass<E> {
    /// Creates a pass using the default react-docgen heuristics.
    pub fn new(options: PassOptions, extractor: E) -> Self {
        Self {
            options,
            extractor,
            predicates: ReactHeuristics,
        }
    }
}

impl<E: DocExtractor, P: ComponentPredicates> DocgenPass<E, P> {
    /// Replaces the component predicates.
    pub fn with_predicates<Q: ComponentPredicates>(self, predicates: Q) -> DocgenPass<E, Q> {
        DocgenPass {
            options: self.options,
            extractor: self.extractor,
            predicates,
        }
    }

    pub fn options(&self) -> &PassOptions {
        &self.options
    }

    /// Collects component definitions in pre-order.
    pub fn collect_candidates(&self, module: &Module) -> Vec<Candidate> {
        let mut collector = CandidateCollector::new(ComponentClassifier::new(&self.predicates));
        module.visit_with(&mut collector);
        collector.candidates
    }

    /// Instruments `module`, whose original text is `source`.
    pub fn run(&self, module: &mut Module, source: &str, filename: &Utf8Path) -> PassOutcome {
        let candidates = self.collect_candidates(module);
        if candidates.is_empty() {
            return PassOutcome::Skipped(SkipReason::NoComponents);
        }

        let Some(first) = candidates
            .iter()
            .find(|candidate| is_exported(candidate, module.items()))
        else {
            tracing::debug!(
                "{}: {} component(s), none exported",
                filename,
                candidates.len()
            );
            return PassOutcome::Skipped(SkipReason::NotExported);
        };

        if already_instrumented(module.items()) {
            tracing::debug!("{}: already instrumented", filename);
            return PassOutcome::Skipped(SkipReason::AlreadyInstrumented);
        }

        let records = DocExtraction::new(
            &self.extractor,
            self.options.resolver,
            self.options.include_methods,
        )
        .extract(source);
        if records.is_empty() {
            return PassOutcome::Skipped(SkipReason::ExtractionFailed);
        }

        let emitter = InstrumentationEmitter::new(
            self.options.collection_name.as_deref(),
            module_path(&self.options.root, filename),
        );

        // Only the first unnamed record may borrow the statically bound name.
        let mut fallback = Some(first.bound_name.clone());
        let mut statements = 0;
        for record in &records {
            let name = match record.display_name() {
                Some(name) => SmolStr::new(name),
                None => match fallback.take() {
                    Some(name) => name,
                    None => {
                        tracing::debug!("{}: skipping second unnamed record", filename);
                        continue;
                    }
                },
            };
            statements += emitter.emit(module, &name, record);
        }

        if statements == 0 {
            return PassOutcome::Skipped(SkipReason::NoRecords);
        }
        tracing::debug!(
            "{}: appended {} docgen statement(s) for {} record(s)",
            filename,
            statements,
            records.len()
        );
        PassOutcome::Instrumented { statements }
    }

    /// Parses `source` and runs the pass over the result.
    pub fn instrument_source(
        &self,
        source: &str,
        filename: &Utf8Path,
    ) -> Result<(Module, PassOutcome), ParseError> {
        let mut module = parse_module(source, filename.as_str())?;
        let outcome = self.run(&mut module, source, filename);
        Ok((module, outcome))
    }
}

/// A declarator name waiting for its initialiser to be visited.
struct PendingBinding {
    name: SmolStr,
    exported: bool,
}

/// Walks a module and classifies every potential component node.
struct CandidateCollector<'c, P: ?Sized> {
    classifier: ComponentClassifier<'c, P>,
    candidates: Vec<Candidate>,
    /// Set while entering the declaration of an export statement.
    export_pending: bool,
    pending: Option<PendingBinding>,
    /// TypeScript namespaces entered; exports inside them are not module exports.
    namespace_depth: usize,
}

impl<'c, P: ComponentPredicates + ?Sized> CandidateCollector<'c, P> {
    fn new(classifier: ComponentClassifier<'c, P>) -> Self {
        Self {
            classifier,
            candidates: Vec::new(),
            export_pending: false,
            pending: None,
            namespace_depth: 0,
        }
    }

    fn record(
        &mut self,
        node: CandidateNode<'_>,
        binding: Binding<'_>,
        directly_exported: bool,
        span: Span,
    ) {
        if let Some((shape, bound_name)) = self.classifier.classify(node, binding) {
            self.candidates.push(Candidate {
                shape,
                bound_name,
                directly_exported,
                span,
            });
        }
    }

    /// Binding for an expression node: the declarator it initialises, else
    /// its own name (only meaningful for named class/function expressions).
    fn expr_binding<'n>(
        &mut self,
        pending: &'n Option<PendingBinding>,
        own: Option<&'n str>,
    ) -> (Binding<'n>, bool) {
        let exported_default = std::mem::take(&mut self.export_pending);
        match (pending, own) {
            (Some(pending), _) => (Binding::Declarator(pending.name.as_str()), pending.exported),
            (None, Some(name)) => (Binding::Declared(name), exported_default),
            (None, None) => (Binding::Anonymous, false),
        }
    }
}

/// Initialisers that can define a component when bound to a variable.
fn is_component_init(expr: &Expr) -> bool {
    match expr {
        Expr::Paren(paren) => is_component_init(&paren.expr),
        Expr::Class(_) | Expr::Fn(_) | Expr::Arrow(_) | Expr::Call(_) => true,
        _ => false,
    }
}

impl<P: ComponentPredicates + ?Sized> Visit for CandidateCollector<'_, P> {
    fn visit_export_decl(&mut self, export: &ExportDecl) {
        self.export_pending = self.namespace_depth == 0
            && matches!(export.decl, Decl::Class(_) | Decl::Fn(_) | Decl::Var(_));
        export.visit_children_with(self);
        self.export_pending = false;
    }

    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        self.export_pending = true;
        export.visit_children_with(self);
        self.export_pending = false;
    }

    fn visit_ts_module_decl(&mut self, decl: &TsModuleDecl) {
        self.export_pending = false;
        self.namespace_depth += 1;
        decl.visit_children_with(self);
        self.namespace_depth -= 1;
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        let exported = std::mem::take(&mut self.export_pending);
        self.record(
            CandidateNode::Class(&decl.class),
            Binding::Declared(decl.ident.sym.as_str()),
            exported,
            decl.class.span,
        );
        decl.visit_children_with(self);
    }

    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        let exported = std::mem::take(&mut self.export_pending);
        self.record(
            CandidateNode::Function(&decl.function),
            Binding::Declared(decl.ident.sym.as_str()),
            exported,
            decl.function.span,
        );
        decl.visit_children_with(self);
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        let exported = std::mem::take(&mut self.export_pending);
        for declarator in &decl.decls {
            if let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init) {
                if is_component_init(init) {
                    self.pending = Some(PendingBinding {
                        name: SmolStr::new(binding.id.sym.as_str()),
                        exported,
                    });
                }
            }
            declarator.visit_children_with(self);
            self.pending = None;
        }
    }

    fn visit_class_expr(&mut self, expr: &ClassExpr) {
        let pending = self.pending.take();
        let own = expr.ident.as_ref().map(|ident| ident.sym.as_str());
        let (binding, exported) = self.expr_binding(&pending, own);
        self.record(
            CandidateNode::Class(&expr.class),
            binding,
            exported,
            expr.class.span,
        );
        expr.visit_children_with(self);
    }

    fn visit_fn_expr(&mut self, expr: &FnExpr) {
        let pending = self.pending.take();
        let own = expr.ident.as_ref().map(|ident| ident.sym.as_str());
        let (binding, exported) = self.expr_binding(&pending, own);
        self.record(
            CandidateNode::Function(&expr.function),
            binding,
            exported,
            expr.function.span,
        );
        expr.visit_children_with(self);
    }

    fn visit_arrow_expr(&mut self, arrow: &ArrowExpr) {
        let pending = self.pending.take();
        let (binding, exported) = self.expr_binding(&pending, None);
        self.record(CandidateNode::Arrow(arrow), binding, exported, arrow.span);
        arrow.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, call: &CallExpr) {
        let pending = self.pending.take();
        let (binding, exported) = self.expr_binding(&pending, None);
        self.record(CandidateNode::Call(call), binding, exported, call.span);
        call.visit_children_with(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ShapeKind;
    use crate::error::ExtractError;
    use crate::record::DocRecord;
    use crate::ResolverStrategy;
    use pretty_assertions::assert_eq;

    fn no_docs(_: &str, _: ResolverStrategy) -> Result<Vec<DocRecord>, ExtractError> {
        Ok(Vec::new())
    }

    fn candidates(source: &str) -> Vec<(ShapeKind, String, bool)> {
        let pass = DocgenPass::new(PassOptions::default(), no_docs);
        let module = parse_module(source, "Test.jsx").unwrap();
        pass.collect_candidates(&module)
            .into_iter()
            .map(|c| (c.shape, c.bound_name.to_string(), c.directly_exported))
            .collect()
    }

    #[test]
    fn test_collects_each_shape_in_order() {
        let found = candidates(
            r#"
            class Panel extends React.Component { render() { return <div />; } }
            function Label() { return <span />; }
            const Badge = () => <i />;
            const Legacy = React.createClass({ render() { return null; } });
            const icon = React.createElement('svg');
            "#,
        );
        assert_eq!(
            found,
            vec![
                (ShapeKind::ClassComponent, "Panel".to_string(), false),
                (ShapeKind::FunctionComponent, "Label".to_string(), false),
                (ShapeKind::FunctionComponent, "Badge".to_string(), false),
                (ShapeKind::FactoryCallComponent, "Legacy".to_string(), false),
                (ShapeKind::ElementAssignmentComponent, "icon".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_marks_direct_exports() {
        let found = candidates(
            r#"
            export class Panel extends React.Component {}
            export const Badge = () => <i />;
            export default function Label() { return <span />; }
            "#,
        );
        assert_eq!(
            found,
            vec![
                (ShapeKind::ClassComponent, "Panel".to_string(), true),
                (ShapeKind::FunctionComponent, "Badge".to_string(), true),
                (ShapeKind::FunctionComponent, "Label".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_export_flag_does_not_leak_into_bodies() {
        let found = candidates(
            r#"
            export function makePanel() {
                class Inner extends React.Component {}
                return Inner;
            }
            "#,
        );
        assert_eq!(
            found,
            vec![(ShapeKind::ClassComponent, "Inner".to_string(), false)]
        );
    }

    #[test]
    fn test_namespace_members_are_not_direct_exports() {
        let pass = DocgenPass::new(PassOptions::default(), no_docs);
        let module = parse_module(
            r#"
            export namespace Widgets {
                class Foo extends React.Component {}
                export class Bar extends React.Component {}
            }
            export class Baz extends React.Component {}
            "#,
            "Widgets.ts",
        )
        .unwrap();
        let found: Vec<_> = pass
            .collect_candidates(&module)
            .into_iter()
            .map(|c| (c.bound_name.to_string(), c.directly_exported))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Foo".to_string(), false),
                ("Bar".to_string(), false),
                ("Baz".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_parenthesised_and_named_expressions() {
        let found = candidates(
            r#"
            const Wrapped = (() => <div />);
            const Alias = class Named extends Component {};
            "#,
        );
        assert_eq!(
            found,
            vec![
                (ShapeKind::FunctionComponent, "Wrapped".to_string(), false),
                (ShapeKind::ClassComponent, "Alias".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_anonymous_definitions_are_skipped() {
        let found = candidates(
            r#"
            render(() => <div />);
            export default class extends React.Component {}
            "#,
        );
        assert!(found.is_empty());
        assert!(candidates("export default () => <div />;").is_empty());
    }

    #[test]
    fn test_factory_call_inside_other_call_is_anonymous() {
        let found = candidates("const wrapped = hoc(React.createClass({}));");
        assert!(found.is_empty());
    }
}
