//! Synthesis of the metadata statements appended to a module.
//!
//! For a component `Foo` in `src/Foo.js` with a collection global `DOCS`,
//! the emitted statements are:
//!
//! ```js
//! Foo.__docgenInfo = { description: "", props: {} };
//! if (typeof DOCS !== "undefined") {
//!   DOCS["src/Foo.js"] = { name: "Foo", docgenInfo: Foo.__docgenInfo, path: "src/Foo.js" };
//! }
//! ```

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use swc_common::{SyntaxContext, DUMMY_SP};
use swc_ecma_ast::{
    AssignExpr, AssignOp, AssignTarget, BinExpr, BinaryOp, BlockStmt, ComputedPropName, Expr,
    ExprStmt, Ident, IdentName, IfStmt, KeyValueProp, MemberExpr, MemberProp, ObjectLit, Prop,
    PropOrSpread, SimpleAssignTarget, Stmt, UnaryExpr, UnaryOp,
};

use crate::body::StatementList;
use crate::guard::DOCGEN_PROPERTY;
use crate::literal::{
    is_binding_identifier, is_identifier_name, prop_name, serialize, string_expr,
};
use crate::record::DocRecord;

struct Registry<'a> {
    global: &'a str,
    module_path: String,
}

/// Appends metadata statements for the records of one module.
pub struct InstrumentationEmitter<'a> {
    registry: Option<Registry<'a>>,
}

impl<'a> InstrumentationEmitter<'a> {
    /// Creates an emitter. `collection_name` enables the registry statement,
    /// keyed by `module_path`.
    pub fn new(collection_name: Option<&'a str>, module_path: String) -> Self {
        let registry = collection_name.and_then(|global| {
            if is_global_path(global) {
                Some(Registry {
                    global,
                    module_path,
                })
            } else {
                tracing::debug!("ignoring invalid docgen collection name `{}`", global);
                None
            }
        });
        Self { registry }
    }

    /// Appends the statements for one record under `name`.
    ///
    /// Returns how many statements were appended.
    pub fn emit<L: StatementList + ?Sized>(
        &self,
        body: &mut L,
        name: &str,
        record: &DocRecord,
    ) -> usize {
        if !is_binding_identifier(name) {
            tracing::debug!("skipping docgen for non-identifier name `{}`", name);
            return 0;
        }
        let Some(literal) = serialize(&record.to_value()) else {
            return 0;
        };

        body.append(assign_stmt(docgen_member(name), literal));
        let Some(registry) = &self.registry else {
            return 1;
        };
        body.append(registration_stmt(registry, name));
        2
    }
}

/// `a.b.c` where `a` is a referenceable variable.
fn is_global_path(path: &str) -> bool {
    let mut segments = path.split('.');
    segments.next().is_some_and(is_binding_identifier) && segments.all(is_identifier_name)
}

/// `<name>.__docgenInfo`
fn docgen_member(name: &str) -> MemberExpr {
    MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(Expr::Ident(ident(name))),
        prop: MemberProp::Ident(IdentName::new(DOCGEN_PROPERTY.into(), DUMMY_SP)),
    }
}

/// `if (typeof G !== "undefined") { G[path] = { name, docgenInfo, path }; }`
fn registration_stmt(registry: &Registry<'_>, name: &str) -> Stmt {
    let test = Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::NotEqEq,
        left: Box::new(Expr::Unary(UnaryExpr {
            span: DUMMY_SP,
            op: UnaryOp::TypeOf,
            arg: Box::new(dotted_expr(registry.global)),
        })),
        right: Box::new(string_expr("undefined")),
    });

    let entry = ObjectLit {
        span: DUMMY_SP,
        props: vec![
            key_value("name", string_expr(name)),
            key_value("docgenInfo", Expr::Member(docgen_member(name))),
            key_value("path", string_expr(&registry.module_path)),
        ],
    };
    let slot = MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(dotted_expr(registry.global)),
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(string_expr(&registry.module_path)),
        }),
    };

    Stmt::If(IfStmt {
        span: DUMMY_SP,
        test: Box::new(test),
        cons: Box::new(Stmt::Block(BlockStmt {
            span: DUMMY_SP,
            ctxt: SyntaxContext::empty(),
            stmts: vec![assign_stmt(slot, Expr::Object(entry))],
        })),
        alt: None,
    })
}

fn assign_stmt(target: MemberExpr, value: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(Expr::Assign(AssignExpr {
            span: DUMMY_SP,
            op: AssignOp::Assign,
            left: AssignTarget::Simple(SimpleAssignTarget::Member(target)),
            right: Box::new(value),
        })),
    })
}

fn key_value(key: &str, value: Expr) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: prop_name(key),
        value: Box::new(value),
    })))
}

fn ident(name: &str) -> Ident {
    Ident::new_no_ctxt(name.into(), DUMMY_SP)
}

/// `a.b.c` as a member chain; a plain name stays an identifier.
fn dotted_expr(path: &str) -> Expr {
    let mut segments = path.split('.');
    let mut expr = Expr::Ident(ident(segments.next().unwrap_or(path)));
    for segment in segments {
        expr = Expr::Member(MemberExpr {
            span: DUMMY_SP,
            obj: Box::new(expr),
            prop: MemberProp::Ident(IdentName::new(segment.into(), DUMMY_SP)),
        });
    }
    expr
}

/// The module's path relative to `root`, with `/` separators.
///
/// Relative inputs are resolved against the current directory first, so a
/// relative root and a relative filename are compared like-for-like.
pub fn module_path(root: &Utf8Path, filename: &Utf8Path) -> String {
    let root = absolutize(root);
    let file = absolutize(filename);
    let root = normalize(&root);
    let file = normalize(&file);

    let common = root
        .iter()
        .zip(file.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    parts.extend(root[common..].iter().map(|_| ".."));
    parts.extend(file[common..].iter().map(Utf8Component::as_str));
    parts.join("/")
}

fn absolutize(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| Utf8PathBuf::try_from(cwd).ok())
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|| path.to_path_buf())
}

fn normalize(path: &Utf8Path) -> Vec<Utf8Component<'_>> {
    let mut components: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match components.last().copied() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components
}
