//! Convenience parsing of component modules.
//!
//! The pass itself works on any [`Module`]; this helper exists for embedders
//! that start from source text and for tests.

use std::sync::Arc;

use swc_common::{FileName, SourceMap};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax, TsSyntax};

use crate::error::ParseError;

/// Parses `source` as an ES module, picking the syntax from the extension.
///
/// `.ts` and `.tsx` files get TypeScript syntax; everything else is parsed as
/// JavaScript with JSX enabled.
pub fn parse_module(source: &str, filename: &str) -> Result<Module, ParseError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom(filename.to_string()).into(),
        source.to_string(),
    );

    let syntax = if filename.ends_with(".tsx") {
        Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        })
    } else if filename.ends_with(".ts") {
        Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        })
    };

    parse_file_as_module(&fm, syntax, EsVersion::Es2022, None, &mut Vec::new()).map_err(|e| {
        ParseError {
            filename: filename.to_string(),
            message: format!("{:?}", e.kind()),
        }
    })
}
