//! Dynamic values.
//!
//! A [`DynamicMessage`] is a generic structured instance bound to exactly
//! one [`TypeDefinition`] — no per-type generated structs exist anywhere
//! in this system. One is created per validation call, populated by the
//! lenient JSON decode, handed to the constraint evaluator, and discarded.
//!
//! Decoding is lenient in two directions:
//! - payload keys with no matching field are silently discarded;
//! - fields with no matching payload key take their kind's zero value.
//!
//! The second point has a visible consequence: a field that is merely
//! absent is indistinguishable, after decoding, from one explicitly set
//! to its zero value, so constraints written for "explicitly set" fields
//! also fire on absent ones. That matches the system this replaces and is
//! kept deliberately.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::descriptor::{FieldDescriptor, FieldKind, TypeDefinition};

/// A single decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    /// The zero value of a message-typed field that was not populated.
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(Vec<DynamicValue>),
    Message(DynamicMessage),
}

impl DynamicValue {
    /// Whether this value is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Double(d) => *d == 0.0,
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Message(_) => false,
        }
    }

    /// Convert to a plain JSON value (used to bind `this` for expression
    /// constraints and in diagnostics).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Message(m) => m.to_json(),
        }
    }
}

/// A generic message instance bound to one type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    definition: TypeDefinition,
    fields: BTreeMap<String, DynamicValue>,
}

impl DynamicMessage {
    /// Decode raw JSON payload bytes into a message bound to `definition`.
    pub fn decode(definition: TypeDefinition, payload: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(payload).map_err(|e| DecodeError::Syntax {
            detail: e.to_string(),
        })?;
        Self::decode_value(definition, &value, "")
    }

    fn decode_value(
        definition: TypeDefinition,
        value: &Value,
        path: &str,
    ) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or_else(|| DecodeError::NotAnObject {
            path: display_path(path),
            found: json_kind(value).to_string(),
        })?;

        let mut fields = BTreeMap::new();
        for field in definition.fields() {
            let field_path = join_path(path, &field.name);
            let decoded = match object.get(&field.name) {
                None | Some(Value::Null) => zero_value(&definition, field),
                Some(raw) => decode_field(&definition, field, raw, &field_path)?,
            };
            fields.insert(field.name.clone(), decoded);
        }
        // Keys not named by the definition are discarded here, by simply
        // never being looked at.
        Ok(Self { definition, fields })
    }

    pub fn definition(&self) -> &TypeDefinition {
        &self.definition
    }

    pub fn get(&self, field: &str) -> Option<&DynamicValue> {
        self.fields.get(field)
    }

    /// Field name/value pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The message as a plain JSON object.
    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

fn decode_field(
    definition: &TypeDefinition,
    field: &FieldDescriptor,
    raw: &Value,
    path: &str,
) -> Result<DynamicValue, DecodeError> {
    if field.repeated {
        let items = raw.as_array().ok_or_else(|| DecodeError::KindMismatch {
            path: path.to_string(),
            expected: format!("list of {}", field.kind.label()),
            found: json_kind(raw).to_string(),
        })?;
        let mut decoded = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let item_path = format!("{path}[{index}]");
            decoded.push(decode_scalar(definition, field, item, &item_path)?);
        }
        return Ok(DynamicValue::List(decoded));
    }
    decode_scalar(definition, field, raw, path)
}

fn decode_scalar(
    definition: &TypeDefinition,
    field: &FieldDescriptor,
    raw: &Value,
    path: &str,
) -> Result<DynamicValue, DecodeError> {
    let mismatch = || DecodeError::KindMismatch {
        path: path.to_string(),
        expected: field.kind.label().to_string(),
        found: json_kind(raw).to_string(),
    };
    match field.kind {
        FieldKind::Bool => raw.as_bool().map(DynamicValue::Bool).ok_or_else(mismatch),
        FieldKind::String => raw
            .as_str()
            .map(|s| DynamicValue::String(s.to_string()))
            .ok_or_else(mismatch),
        FieldKind::Int => decode_int(raw).map(DynamicValue::Int).ok_or_else(mismatch),
        FieldKind::Double => raw.as_f64().map(DynamicValue::Double).ok_or_else(mismatch),
        FieldKind::Message => {
            let nested = definition.field_message(field).ok_or_else(mismatch)?;
            DynamicMessage::decode_value(nested, raw, path).map(DynamicValue::Message)
        }
    }
}

/// Integers are accepted as exact JSON integers, or as floats with no
/// fractional part (the common output of JSON encoders that only have one
/// number type).
fn decode_int(raw: &Value) -> Option<i64> {
    if let Some(i) = raw.as_i64() {
        return Some(i);
    }
    let f = raw.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        return Some(f as i64);
    }
    None
}

fn zero_value(_definition: &TypeDefinition, field: &FieldDescriptor) -> DynamicValue {
    if field.repeated {
        return DynamicValue::List(Vec::new());
    }
    match field.kind {
        FieldKind::Bool => DynamicValue::Bool(false),
        FieldKind::Int => DynamicValue::Int(0),
        FieldKind::Double => DynamicValue::Double(0.0),
        FieldKind::String => DynamicValue::String(String::new()),
        // An unpopulated message field stays unset rather than being
        // zero-filled recursively.
        FieldKind::Message => DynamicValue::Null,
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
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

/// A payload that could not be decoded against the type definition.
///
/// Decode failures abort validation before the constraint evaluator runs;
/// they are never mixed into the constraint-violation list.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON payload: {detail}")]
    Syntax { detail: String },
    #[error("expected a JSON object at {path}, found {found}")]
    NotAnObject { path: String, found: String },
    #[error("field {path}: expected {expected}, found {found}")]
    KindMismatch {
        path: String,
        expected: String,
        found: String,
    },
}
