//! Typed attribute values.

use serde::{Deserialize, Serialize};
use terrawire::DataKind;

/// One decoded attribute value.
///
/// The wire formats tag each value with a kind code and carry either a
/// number or a string; here the kind and the payload are one variant, so
/// a value can never claim to be numeric while holding text.
///
/// Serializes with an explicit tag for JSONL sinks:
/// ```json
/// {"type":"number","value":36.6}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    /// Timestamps stay in producer text form; the cache does not parse them.
    DateTime(String),
    Text(String),
}

impl AttrValue {
    /// The wire kind this value decodes from.
    pub fn kind(&self) -> DataKind {
        match self {
            AttrValue::Bool(_) => DataKind::Bool,
            AttrValue::Number(_) => DataKind::Number,
            AttrValue::DateTime(_) => DataKind::DateTime,
            AttrValue::Text(_) => DataKind::Text,
        }
    }

    /// Numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual payload, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}
