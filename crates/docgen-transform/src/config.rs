//! Pass configuration.
//!
//! Options are usually supplied as the JSON options object of a build plugin:
//!
//! ```json
//! {
//!   "resolver": "findAllExportedComponentDefinitions",
//!   "includeMethods": false,
//!   "DOC_GEN_COLLECTION_NAME": "STORYBOOK_REACT_CLASSES"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::error::ConfigError;

/// The extraction strategy handed to the documentation extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverStrategy {
    /// Every exported component definition in the module.
    #[default]
    FindAllExported,
    /// The single exported component definition.
    FindExported,
    /// Every component definition, exported or not.
    FindAll,
}

impl ResolverStrategy {
    /// The extractor-side name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolverStrategy::FindAllExported => "findAllExportedComponentDefinitions",
            ResolverStrategy::FindExported => "findExportedComponentDefinition",
            ResolverStrategy::FindAll => "findAllComponentDefinitions",
        }
    }
}

impl fmt::Display for ResolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolverStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "findAllExportedComponentDefinitions" => Ok(ResolverStrategy::FindAllExported),
            "findExportedComponentDefinition" => Ok(ResolverStrategy::FindExported),
            "findAllComponentDefinitions" => Ok(ResolverStrategy::FindAll),
            other => Err(ConfigError::UnknownResolver(other.to_string())),
        }
    }
}

/// Configuration for [`crate::DocgenPass`].
#[derive(Debug, Clone)]
pub struct PassOptions {
    /// Strategy passed to the extractor.
    pub resolver: ResolverStrategy,
    /// Whether the `methods` field survives into the emitted literal.
    pub include_methods: bool,
    /// Global registry that collects every instrumented component.
    pub collection_name: Option<String>,
    /// Project root that module paths are made relative to.
    pub root: Utf8PathBuf,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            resolver: ResolverStrategy::default(),
            include_methods: false,
            collection_name: None,
            root: Utf8PathBuf::from("."),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOptions {
    resolver: Option<String>,
    include_methods: bool,
    #[serde(rename = "DOC_GEN_COLLECTION_NAME")]
    doc_gen_collection_name: Option<String>,
    #[serde(rename = "DOC_GEN_GLOBAL")]
    doc_gen_global: Option<String>,
    root: Option<Utf8PathBuf>,
}

impl PassOptions {
    /// Parses a plugin options object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawOptions = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Builds options from an already-parsed options object.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let raw: RawOptions = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawOptions) -> Result<Self, ConfigError> {
        let resolver = match raw.resolver.as_deref() {
            Some(name) => name.parse()?,
            None => ResolverStrategy::default(),
        };

        // The collection name supersedes the legacy single-global option.
        let collection_name = raw
            .doc_gen_collection_name
            .filter(|name| !name.is_empty())
            .or(raw.doc_gen_global.filter(|name| !name.is_empty()));

        Ok(Self {
            resolver,
            include_methods: raw.include_methods,
            collection_name,
            root: raw.root.unwrap_or_else(|| Utf8PathBuf::from(".")),
        })
    }

    pub fn with_resolver(mut self, resolver: ResolverStrategy) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_include_methods(mut self, include_methods: bool) -> Self {
        self.include_methods = include_methods;
        self
    }

    /// Enables the global registry statement.
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into()).filter(|name| !name.is_empty());
        self
    }

    pub fn with_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
