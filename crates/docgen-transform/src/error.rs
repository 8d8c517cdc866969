//! Error types.
//!
//! None of these ever escape [`crate::DocgenPass::run`]; extraction errors are
//! swallowed by the adapter and configuration errors surface only while
//! options are being built.

use thiserror::Error;

/// An error reported by a documentation extractor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The extractor raised while processing the source.
    #[error("documentation extraction failed: {0}")]
    Failed(String),

    /// The source contained no component the extractor could document.
    #[error("no suitable component definition found")]
    NoComponent,

    /// The extractor produced output that is not a documentation record.
    #[error("invalid extractor output: {0}")]
    InvalidOutput(String),
}

/// An error in the pass configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options object could not be deserialized.
    #[error("invalid docgen options: {0}")]
    Json(#[from] serde_json::Error),

    /// The resolver name is not one of the known strategies.
    #[error("unknown resolver `{0}`")]
    UnknownResolver(String),
}

/// A module that could not be parsed.
#[derive(Debug, Clone, Error)]
#[error("failed to parse {filename}: {message}")]
pub struct ParseError {
    /// The file being parsed.
    pub filename: String,
    /// The parser's description of the problem.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        insta::assert_snapshot!(
            ExtractError::Failed("Unexpected token".to_string()).to_string(),
            @"documentation extraction failed: Unexpected token"
        );
        insta::assert_snapshot!(
            ConfigError::UnknownResolver("findNothing".to_string()).to_string(),
            @"unknown resolver `findNothing`"
        );
        let err = ParseError {
            filename: "src/Foo.js".to_string(),
            message: "Expected ';'".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"failed to parse src/Foo.js: Expected ';'");
    }
}
