//! Interfaces consumed from the host framework.
//!
//! The core never reaches into a host model directly. It reads and writes
//! attributes through [`HostEntity`] and looks up submitted form values through
//! [`FormRequest`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::FieldError;

/// How a host attribute is cast between its stored and in-memory forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastKind {
    Array,
    Json,
    Object,
    Collection,
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
}

impl CastKind {
    /// Structured casts decode to a nested map and may be filled by path.
    pub fn is_structured(self) -> bool {
        matches!(self, CastKind::Array | CastKind::Json | CastKind::Object | CastKind::Collection)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CastKind::Array => "array",
            CastKind::Json => "json",
            CastKind::Object => "object",
            CastKind::Collection => "collection",
            CastKind::String => "string",
            CastKind::Integer => "integer",
            CastKind::Float => "float",
            CastKind::Boolean => "boolean",
            CastKind::Datetime => "datetime",
        }
    }
}

impl fmt::Display for CastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CastKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "array" => Ok(CastKind::Array),
            "json" => Ok(CastKind::Json),
            "object" => Ok(CastKind::Object),
            "collection" => Ok(CastKind::Collection),
            "string" => Ok(CastKind::String),
            "integer" | "int" => Ok(CastKind::Integer),
            "float" | "double" | "real" => Ok(CastKind::Float),
            "boolean" | "bool" => Ok(CastKind::Boolean),
            "datetime" | "date" => Ok(CastKind::Datetime),
            other => Err(format!("unknown cast `{other}`")),
        }
    }
}

/// A host model whose attributes the fields read from and write to.
///
/// Implemented by hand, by [`Record`], or with `#[derive(HostEntity)]`.
pub trait HostEntity {
    /// Current value of the attribute, `None` when unset or unknown.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Replaces the attribute. Implementations must leave the attribute untouched on error.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), FieldError>;

    /// Declared cast of the attribute, if any.
    fn cast(&self, name: &str) -> Option<CastKind>;

    /// Whether the attribute is declared with a structured cast.
    fn has_structured_cast(&self, name: &str) -> bool {
        self.cast(name).is_some_and(CastKind::is_structured)
    }
}

/// Read-only lookup over submitted form values, keyed by full path string.
pub trait FormRequest {
    /// Raw submitted value for `key`.
    fn input(&self, key: &str) -> Option<&str>;

    fn has(&self, key: &str) -> bool {
        self.input(key).is_some()
    }
}

impl FormRequest for HashMap<String, String> {
    fn input(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl FormRequest for BTreeMap<String, String> {
    fn input(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// In-memory host entity: an attribute map plus declared casts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub casts: BTreeMap<String, CastKind>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cast(mut self, name: impl Into<String>, cast: CastKind) -> Self {
        self.casts.insert(name.into(), cast);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl HostEntity for Record {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<(), FieldError> {
        self.attributes.insert(name.to_string(), value);
        Ok(())
    }

    fn cast(&self, name: &str) -> Option<CastKind> {
        self.casts.get(name).copied()
    }
}

/// Submitted form values keyed by working path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedForm(BTreeMap<String, String>);

impl SubmittedForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builds a form from a flat JSON object. Non-string scalars are kept in
    /// their JSON text form; `null` becomes an empty string. Anything other
    /// than an object fails with [`FieldError::Serialization`].
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        let object = Map::<String, Value>::deserialize(value)?;
        let mut form = Self::new();
        for (key, value) in object {
            let raw = match value {
                Value::String(text) => text,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            form.insert(key, raw);
        }
        Ok(form)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FormRequest for SubmittedForm {
    fn input(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for SubmittedForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_casts() {
        assert!(CastKind::Array.is_structured());
        assert!(CastKind::Collection.is_structured());
        assert!(!CastKind::String.is_structured());
        assert_eq!("bool".parse::<CastKind>(), Ok(CastKind::Boolean));
        assert!("uuid".parse::<CastKind>().is_err());
    }

    #[test]
    fn record_reports_casts() {
        let record = Record::new()
            .with_cast("address", CastKind::Array)
            .with_cast("name", CastKind::String);
        assert!(record.has_structured_cast("address"));
        assert!(!record.has_structured_cast("name"));
        assert!(!record.has_structured_cast("missing"));
    }

    #[test]
    fn record_deserializes_from_json() {
        let record: Record = serde_json::from_value(json!({
            "attributes": {"address": {"street": "x"}},
            "casts": {"address": "array"}
        }))
        .unwrap();
        assert_eq!(record.cast("address"), Some(CastKind::Array));
        assert_eq!(record.attribute("address"), Some(json!({"street": "x"})));
    }

    #[test]
    fn submitted_form_from_json_keeps_raw_text() {
        let form = SubmittedForm::from_json(&json!({
            "address->street": "main",
            "address->number": 12,
            "address->note": null
        }))
        .unwrap();
        assert_eq!(form.input("address->street"), Some("main"));
        assert_eq!(form.input("address->number"), Some("12"));
        assert_eq!(form.input("address->note"), Some(""));
        assert!(!form.has("address->zip"));
    }

    #[test]
    fn submitted_form_must_be_an_object() {
        let err = SubmittedForm::from_json(&json!(["address->street"])).unwrap_err();
        assert!(matches!(err, FieldError::Serialization(_)));
    }
}
