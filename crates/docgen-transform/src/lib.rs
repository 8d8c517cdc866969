//! react-docgen metadata injection for swc modules.
//!
//! This crate finds React component definitions in a parsed module, checks
//! that they are reachable from the module's exports, runs a documentation
//! extractor over the source and appends the results to the module:
//!
//! ```js
//! Foo.__docgenInfo = { "description": "", "displayName": "Foo", ... };
//! if (typeof STORYBOOK_REACT_CLASSES !== "undefined") {
//!   STORYBOOK_REACT_CLASSES["src/Foo.js"] = { name: "Foo", docgenInfo: Foo.__docgenInfo, path: "src/Foo.js" };
//! }
//! ```
//!
//! The registry block is only emitted when a collection name is configured.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use docgen_transform::{
//!     DocRecord, DocgenPass, ExtractError, PassOptions, PassOutcome, ResolverStrategy,
//! };
//!
//! let extractor = |_: &str, _: ResolverStrategy| -> Result<Vec<DocRecord>, ExtractError> {
//!     Ok(vec![DocRecord::new().with_field("description", "")])
//! };
//! let pass = DocgenPass::new(PassOptions::default(), extractor);
//!
//! let source = "export const Foo = () => <div />;";
//! let (module, outcome) = pass
//!     .instrument_source(source, Utf8Path::new("Foo.jsx"))
//!     .unwrap();
//! assert_eq!(outcome, PassOutcome::Instrumented { statements: 1 });
//! assert_eq!(module.body.len(), 2);
//! ```

mod body;
mod classify;
mod config;
mod emit;
mod error;
mod exports;
mod extract;
mod guard;
mod literal;
mod parse;
mod pass;
mod predicates;
mod record;

pub use body::StatementList;
pub use classify::{
    match_factory_callee, Binding, Candidate, CandidateNode, ComponentClassifier, FactoryCallee,
    ShapeKind,
};
pub use config::{PassOptions, ResolverStrategy};
pub use emit::{module_path, InstrumentationEmitter};
pub use error::{ConfigError, ExtractError, ParseError};
pub use exports::{is_exported, resolve_exported_ident, MAX_UNWRAP_DEPTH};
pub use extract::{DocExtraction, DocExtractor};
pub use guard::{already_instrumented, DOCGEN_PROPERTY};
pub use literal::{evaluate, serialize};
pub use parse::parse_module;
pub use pass::{DocgenPass, PassOutcome, SkipReason};
pub use predicates::{ComponentPredicates, FunctionLike, ReactHeuristics};
pub use record::{DocRecord, DocValue, DISPLAY_NAME_FIELD, METHODS_FIELD};
