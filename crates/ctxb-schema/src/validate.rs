//! # Schema Subset Checking
//!
//! A schema document is compiled once into a [`SchemaSubset`], which is
//! immutable and `Send + Sync`, then applied to any number of packets.
//!
//! ## Issue Order
//!
//! Issues are emitted in keyword-evaluation order:
//!
//! 1. `required`, in listed order.
//! 2. `additionalProperties`, in the packet's own key order.
//! 3. `properties.<name>.type`, in schema-declared order.
//! 4. `properties.<name>.items.type`, per element, right after the owning
//!    property's own type check.

use ctxb_core::packet::require_object;
use ctxb_core::{CtxbError, IssueCode, Packet, ValidationIssue, ValueKind};
use serde_json::{Map, Value};

/// Longest rendered value quoted in a type-mismatch message.
const MAX_QUOTED_VALUE_LEN: usize = 80;

/// A `type` keyword the checker enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeConstraint {
    String,
    Object,
    Array,
}

impl TypeConstraint {
    /// Read a `type` keyword. Anything but the three enforced names, including
    /// union arrays like `["string", "null"]`, means "no constraint".
    pub fn from_keyword(value: Option<&Value>) -> Option<Self> {
        match value.and_then(Value::as_str)? {
            "string" => Some(Self::String),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Whether `value` has the required kind.
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, ValueKind::of(value)),
            (Self::String, ValueKind::String)
                | (Self::Object, ValueKind::Object)
                | (Self::Array, ValueKind::Array)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// Compiled `properties.<name>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    /// Enforced `type`, if any.
    pub kind: Option<TypeConstraint>,
    /// Enforced `items.type`, if any. Only consulted for array values.
    pub items: Option<TypeConstraint>,
}

impl PropertySpec {
    fn compile(spec: &Value) -> Self {
        let kind = TypeConstraint::from_keyword(spec.get("type"));
        let items = spec
            .get("items")
            .and_then(|items| TypeConstraint::from_keyword(items.get("type")));
        Self { kind, items }
    }
}

/// The enforced slice of a packet schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSubset {
    required: Vec<String>,
    properties: Vec<(String, PropertySpec)>,
    additional_properties: bool,
}

impl SchemaSubset {
    /// Compile a parsed schema document.
    ///
    /// # Errors
    ///
    /// Returns [`CtxbError::InvalidPacketShape`] if `schema` is not a JSON
    /// object. Ill-formed keywords inside the object are ignored.
    pub fn from_value(schema: &Value) -> Result<Self, CtxbError> {
        let root = require_object(schema, "schema")?;

        let required = root
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let properties = root
            .get("properties")
            .and_then(Value::as_object)
            .map(compile_properties)
            .unwrap_or_default();

        let additional_properties = !matches!(root.get("additionalProperties"), Some(Value::Bool(false)));

        Ok(Self {
            required,
            properties,
            additional_properties,
        })
    }

    /// Required field names, in schema order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Compiled property specs, in schema order.
    pub fn properties(&self) -> &[(String, PropertySpec)] {
        &self.properties
    }

    /// Whether undeclared top-level keys are tolerated.
    pub fn allows_additional_properties(&self) -> bool {
        self.additional_properties
    }

    /// Look up a declared property.
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, spec)| spec)
    }

    /// Apply the schema to a packet, returning every structural defect.
    pub fn check(&self, packet: &Packet) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for name in &self.required {
            if !packet.contains(name) {
                issues.push(violation(name, format!("'{name}' is a required property")));
            }
        }

        if !self.additional_properties {
            for key in packet.keys() {
                if self.property(key).is_none() {
                    issues.push(violation(
                        key,
                        format!("additional properties are not allowed ('{key}' was unexpected)"),
                    ));
                }
            }
        }

        for (name, spec) in &self.properties {
            let Some(value) = packet.get(name) else {
                continue;
            };

            if let Some(kind) = spec.kind {
                if !kind.matches(value) {
                    issues.push(violation(name, type_mismatch(value, kind)));
                }
            }

            if let (Some(TypeConstraint::Array), Some(items), Value::Array(elements)) =
                (spec.kind, spec.items, value)
            {
                for (index, element) in elements.iter().enumerate() {
                    if !items.matches(element) {
                        issues.push(violation(
                            &index_path(name, index),
                            type_mismatch(element, items),
                        ));
                    }
                }
            }
        }

        issues
    }
}

/// Compile `schema` and check `packet` against it in one call.
///
/// Prefer [`SchemaSubset::from_value`] plus [`SchemaSubset::check`] when the
/// same schema is applied to many packets.
pub fn check_schema(packet: &Packet, schema: &Value) -> Result<Vec<ValidationIssue>, CtxbError> {
    Ok(SchemaSubset::from_value(schema)?.check(packet))
}

fn compile_properties(properties: &Map<String, Value>) -> Vec<(String, PropertySpec)> {
    properties
        .iter()
        .map(|(name, spec)| (name.clone(), PropertySpec::compile(spec)))
        .collect()
}

fn violation(path: &str, message: String) -> ValidationIssue {
    ValidationIssue::new(IssueCode::SchemaViolation, path, message)
}

fn index_path(name: &str, index: usize) -> String {
    format!("{name}[{index}]")
}

fn type_mismatch(value: &Value, expected: TypeConstraint) -> String {
    format!("{} is not of type '{}'", quote_value(value), expected.as_str())
}

fn quote_value(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_QUOTED_VALUE_LEN {
        return rendered;
    }
    let head: String = rendered.chars().take(MAX_QUOTED_VALUE_LEN).collect();
    format!("{head}...")
}
