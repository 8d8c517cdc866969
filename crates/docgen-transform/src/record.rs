//! Documentation record types.
//!
//! Records are produced by an external extractor (react-docgen) and are
//! plain JSON-like trees. [`DocValue::Undefined`] exists so that extractors
//! built in Rust can mark a field as present-but-unset, which the serializer
//! drops.

use indexmap::IndexMap;

use crate::error::ExtractError;

/// Field holding the component name.
pub const DISPLAY_NAME_FIELD: &str = "displayName";
/// Field holding the documented instance methods.
pub const METHODS_FIELD: &str = "methods";

/// A JSON-like value inside a documentation record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocValue {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<DocValue>),
    Object(IndexMap<String, DocValue>),
}

impl DocValue {
    /// Returns the string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, DocValue::Undefined)
    }
}

impl From<serde_json::Value> for DocValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DocValue::Null,
            serde_json::Value::Bool(value) => DocValue::Bool(value),
            serde_json::Value::Number(number) => {
                DocValue::Number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(value) => DocValue::String(value),
            serde_json::Value::Array(items) => {
                DocValue::Array(items.into_iter().map(DocValue::from).collect())
            }
            serde_json::Value::Object(map) => DocValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, DocValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for DocValue {
    fn from(value: &str) -> Self {
        DocValue::String(value.to_string())
    }
}

impl From<bool> for DocValue {
    fn from(value: bool) -> Self {
        DocValue::Bool(value)
    }
}

impl From<f64> for DocValue {
    fn from(value: f64) -> Self {
        DocValue::Number(value)
    }
}

fn strip_key(fields: &mut IndexMap<String, DocValue>, key: &str) {
    fields.shift_remove(key);
    for value in fields.values_mut() {
        strip_nested(value, key);
    }
}

fn strip_nested(value: &mut DocValue, key: &str) {
    match value {
        DocValue::Object(fields) => strip_key(fields, key),
        DocValue::Array(items) => items.iter_mut().for_each(|item| strip_nested(item, key)),
        _ => {}
    }
}

/// One component's documentation, as an ordered field map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocRecord {
    fields: IndexMap<String, DocValue>,
}

impl DocRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field, keeping the original position on replace.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<DocValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.fields.get(key)
    }

    /// The component name reported by the extractor.
    ///
    /// Empty strings count as missing.
    pub fn display_name(&self) -> Option<&str> {
        self.get(DISPLAY_NAME_FIELD)
            .and_then(DocValue::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Drops every `methods` field, including those of nested objects.
    pub fn strip_methods(&mut self) {
        strip_key(&mut self.fields, METHODS_FIELD);
    }

    pub fn fields(&self) -> &IndexMap<String, DocValue> {
        &self.fields
    }

    /// Converts the record into an object value for serialization.
    pub fn to_value(&self) -> DocValue {
        DocValue::Object(self.fields.clone())
    }

    /// Builds records from extractor JSON output.
    ///
    /// A top-level array yields one record per element; a single object
    /// yields one record. Anything else is rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Vec<DocRecord>, ExtractError> {
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(DocRecord::from_json_object)
                .collect(),
            object @ serde_json::Value::Object(_) => Ok(vec![DocRecord::from_json_object(object)?]),
            other => Err(ExtractError::InvalidOutput(format!(
                "expected an object or an array of objects, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Parses extractor output text with [`DocRecord::from_json`].
    pub fn from_json_str(text: &str) -> Result<Vec<DocRecord>, ExtractError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ExtractError::InvalidOutput(e.to_string()))?;
        Self::from_json(value)
    }

    fn from_json_object(value: serde_json::Value) -> Result<DocRecord, ExtractError> {
        match DocValue::from(value) {
            DocValue::Object(fields) => Ok(DocRecord { fields }),
            other => Err(ExtractError::InvalidOutput(format!(
                "expected a documentation object, found {}",
                doc_kind(&other)
            ))),
        }
    }
}

impl From<IndexMap<String, DocValue>> for DocRecord {
    fn from(fields: IndexMap<String, DocValue>) -> Self {
        Self { fields }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn doc_kind(value: &DocValue) -> &'static str {
    match value {
        DocValue::Undefined => "undefined",
        DocValue::Null => "null",
        DocValue::Bool(_) => "a boolean",
        DocValue::Number(_) => "a number",
        DocValue::String(_) => "a string",
        DocValue::Array(_) => "an array",
        DocValue::Object(_) => "an object",
    }
}
