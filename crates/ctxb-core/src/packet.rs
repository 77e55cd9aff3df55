//! # Packet Shape
//!
//! A context packet has no fixed struct: it is a JSON object whose fields are
//! looked up by name. [`Packet`] wraps the top-level `serde_json` map and
//! rejects any other top-level kind at construction.

use serde_json::{Map, Value};

use crate::error::CtxbError;

/// Runtime kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// JSON Schema name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Borrow the object map of a top-level document, or report its shape.
pub fn require_object<'a>(
    value: &'a Value,
    document: &'static str,
) -> Result<&'a Map<String, Value>, CtxbError> {
    value.as_object().ok_or(CtxbError::InvalidPacketShape {
        document,
        found: ValueKind::of(value).as_str(),
    })
}

/// A parsed context packet: a JSON object in document key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    fields: Map<String, Value>,
}

impl Packet {
    /// Wrap a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CtxbError::InvalidPacketShape`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, CtxbError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CtxbError::InvalidPacketShape {
                document: "packet",
                found: ValueKind::of(&other).as_str(),
            }),
        }
    }

    /// Parse a packet from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, CtxbError> {
        Self::from_value(serde_json::from_str(s)?)
    }

    /// Look up a top-level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Whether a top-level key is present, whatever its value.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The `schema_version` field, if present and a string.
    pub fn schema_version(&self) -> Option<&str> {
        self.fields.get("schema_version").and_then(Value::as_str)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Value> for Packet {
    type Error = CtxbError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
