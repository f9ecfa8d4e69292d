//! Configuration document codec
//!
//! The whole set of configured limits lives in one JSON object keyed by
//! variant id. Decoding never fails: a blob that is absent or unreadable
//! means nothing has been configured yet.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;
use tracing::{debug, warn};

/// A limit as stored in the blob
///
/// The editor writes the raw text of the number field, other writers may
/// store plain numbers. Blank text means "no limit".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LimitValue {
    Number(Number),
    Text(String),
}

impl LimitValue {
    /// Blank value written when the operator clears a field
    pub fn unset() -> Self {
        LimitValue::Text(String::new())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, LimitValue::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Number(number) => write!(f, "{number}"),
            LimitValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for LimitValue {
    fn from(raw: &str) -> Self {
        LimitValue::Text(raw.to_string())
    }
}

impl From<String> for LimitValue {
    fn from(raw: String) -> Self {
        LimitValue::Text(raw)
    }
}

impl From<u64> for LimitValue {
    fn from(limit: u64) -> Self {
        LimitValue::Number(limit.into())
    }
}

/// Variant id -> limit, in insertion order
///
/// A missing key means no limit was ever configured for that variant,
/// which is not the same as a limit of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigurationDocument {
    limits: IndexMap<String, LimitValue>,
}

impl ConfigurationDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variant_id: &str) -> Option<&LimitValue> {
        self.limits.get(variant_id)
    }

    /// Insert or replace; a replaced key keeps its position
    pub fn set(&mut self, variant_id: impl Into<String>, value: impl Into<LimitValue>) {
        self.limits.insert(variant_id.into(), value.into());
    }

    /// Copy of this document with one entry changed
    pub fn with_limit(&self, variant_id: impl Into<String>, value: impl Into<LimitValue>) -> Self {
        let mut next = self.clone();
        next.set(variant_id, value);
        next
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Decode the persisted blob, falling back to an empty document
pub fn decode(raw: Option<&str>) -> ConfigurationDocument {
    let Some(raw) = raw else {
        debug!("No persisted configuration, starting empty");
        return ConfigurationDocument::new();
    };

    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Persisted configuration is not valid JSON, starting empty");
            return ConfigurationDocument::new();
        }
    };

    let entries = match value {
        Value::Object(entries) => entries,
        other => {
            warn!(kind = %json_kind(&other), "Persisted configuration is not a JSON object, starting empty");
            return ConfigurationDocument::new();
        }
    };

    let mut document = ConfigurationDocument::new();
    for (variant_id, value) in entries {
        match value {
            Value::Number(number) => document.set(variant_id, LimitValue::Number(number)),
            Value::String(text) => document.set(variant_id, LimitValue::Text(text)),
            Value::Null => document.set(variant_id, LimitValue::unset()),
            other => {
                warn!(variant = %variant_id, kind = %json_kind(&other), "Ignoring non-scalar limit value");
            }
        }
    }

    debug!(entries = document.len(), "Decoded persisted configuration");
    document
}

/// Encode as a flat JSON object in insertion order
pub fn encode(document: &ConfigurationDocument) -> serde_json::Result<String> {
    serde_json::to_string(document)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
