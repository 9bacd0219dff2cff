//! Type descriptor model.
//!
//! A **descriptor document** is the JSON wire form in which type
//! definitions travel: the compiled-in registry embeds one, and the remote
//! reflection service returns one. A [`TypeDefinitionSet`] is the indexed,
//! queryable form: every message (including nested ones) is addressable by
//! its fully-qualified name, and message-typed fields are checked to
//! resolve within the set.
//!
//! Descriptors are only ever produced by decoding a document — callers
//! never construct a [`TypeDefinition`] by hand.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::name::TypeName;

// ── Wire form ────────────────────────────────────────────────────────

/// A full descriptor document: one or more files of type definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSet {
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

/// One source file's worth of definitions under a single package.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub package: String,
    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
}

/// A message definition: named fields plus optional nested messages and
/// message-level expression constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    pub name: String,
    /// Leading documentation comment from the schema author, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
    #[serde(default)]
    pub constraints: Vec<ExpressionRule>,
}

/// A named enumeration. Enums participate in name lookup (so a name that
/// resolves to one is reported as "not a message") but are otherwise
/// represented as strings on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// One field of a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// For `kind: message`, the fully-qualified name of the target type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub repeated: bool,
    #[serde(default)]
    pub rules: FieldRules,
}

/// The primitive kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Int,
    Double,
    String,
    Message,
}

impl FieldKind {
    /// Human-readable kind name, used in decode diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Message => "message",
        }
    }
}

/// Declarative per-field constraints.
///
/// Rules apply to whatever value the field holds after decoding — for a
/// field absent from the payload that is its zero value. `ignore_empty`
/// opts a field out of that: its rules are skipped while the field is at
/// its zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldRules {
    pub required: bool,
    pub min_len: Option<u64>,
    pub max_len: Option<u64>,
    pub pattern: Option<String>,
    pub gte: Option<f64>,
    pub lte: Option<f64>,
    pub ignore_empty: bool,
}

impl FieldRules {
    /// True when no rule is set at all.
    pub fn is_vacuous(&self) -> bool {
        !self.required
            && self.min_len.is_none()
            && self.max_len.is_none()
            && self.pattern.is_none()
            && self.gte.is_none()
            && self.lte.is_none()
    }
}

/// A message-level expression constraint (cross-field, conditional).
///
/// `expression` is a CEL expression over `this`, the decoded message.
/// `message` is the author's declared violation text; it may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionRule {
    pub id: String,
    #[serde(default)]
    pub message: String,
    pub expression: String,
}

// ── Indexed form ─────────────────────────────────────────────────────

/// An indexed message definition, addressable by fully-qualified name.
#[derive(Debug)]
pub struct MessageType {
    pub full_name: String,
    pub name: String,
    pub doc: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub constraints: Vec<ExpressionRule>,
}

#[derive(Debug)]
enum Entry {
    Message(Arc<MessageType>),
    Enum,
}

/// An indexed, queryable set of type definitions.
///
/// Cheap to clone (the index is shared). The compiled-in registry holds
/// one for the process lifetime; a reflection response is decoded into one
/// scoped to a single request.
#[derive(Debug, Clone)]
pub struct TypeDefinitionSet {
    entries: Arc<HashMap<String, Entry>>,
    /// Fully-qualified message names in depth-first declaration order,
    /// used for deterministic enumeration.
    order: Arc<Vec<String>>,
}

impl TypeDefinitionSet {
    /// Index a descriptor document.
    ///
    /// Checks internal consistency: duplicate fully-qualified names and
    /// message-typed fields whose target is missing from the set are
    /// rejected.
    pub fn from_document(set: DescriptorSet) -> Result<Self, DescriptorError> {
        let mut entries = HashMap::new();
        let mut order = Vec::new();

        for file in &set.files {
            for message in &file.messages {
                index_message(&file.package, message, &mut entries, &mut order)?;
            }
            for en in &file.enums {
                let full_name = format!("{}.{}", file.package, en.name);
                if entries.insert(full_name.clone(), Entry::Enum).is_some() {
                    return Err(DescriptorError::DuplicateName { name: full_name });
                }
            }
        }

        let set = Self {
            entries: Arc::new(entries),
            order: Arc::new(order),
        };
        set.check_field_targets()?;
        Ok(set)
    }

    /// Parse and index a descriptor document from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DescriptorError> {
        let document: DescriptorSet =
            serde_json::from_slice(bytes).map_err(|e| DescriptorError::Malformed {
                detail: e.to_string(),
            })?;
        Self::from_document(document)
    }

    fn check_field_targets(&self) -> Result<(), DescriptorError> {
        for name in self.order.iter() {
            let Some(Entry::Message(message)) = self.entries.get(name) else {
                continue;
            };
            for field in &message.fields {
                if field.kind != FieldKind::Message {
                    continue;
                }
                let target = field.message.as_deref().ok_or_else(|| {
                    DescriptorError::MissingTarget {
                        message: message.full_name.clone(),
                        field: field.name.clone(),
                    }
                })?;
                match self.entries.get(target) {
                    Some(Entry::Message(_)) => {}
                    _ => {
                        return Err(DescriptorError::UnresolvedTarget {
                            message: message.full_name.clone(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        })
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a message definition by exact fully-qualified name.
    pub fn definition(&self, name: &TypeName) -> Result<TypeDefinition, LookupError> {
        match self.entries.get(name.as_str()) {
            Some(Entry::Message(message)) => Ok(TypeDefinition {
                set: self.clone(),
                message: Arc::clone(message),
            }),
            Some(Entry::Enum) => Err(LookupError::NotAMessage {
                name: name.as_str().to_string(),
            }),
            None => Err(LookupError::NotFound {
                name: name.as_str().to_string(),
            }),
        }
    }

    /// Whether the set contains a message with this exact name.
    pub fn contains_message(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Message(_)))
    }

    /// All message definitions in depth-first declaration order.
    pub fn iter_messages(&self) -> impl Iterator<Item = TypeDefinition> + '_ {
        self.order.iter().filter_map(move |name| {
            match self.entries.get(name) {
                Some(Entry::Message(message)) => Some(TypeDefinition {
                    set: self.clone(),
                    message: Arc::clone(message),
                }),
                _ => None,
            }
        })
    }
}

fn index_message(
    scope: &str,
    descriptor: &MessageDescriptor,
    entries: &mut HashMap<String, Entry>,
    order: &mut Vec<String>,
) -> Result<(), DescriptorError> {
    let full_name = format!("{}.{}", scope, descriptor.name);
    let message = MessageType {
        full_name: full_name.clone(),
        name: descriptor.name.clone(),
        doc: descriptor.doc.clone(),
        fields: descriptor.fields.clone(),
        constraints: descriptor.constraints.clone(),
    };
    if entries
        .insert(full_name.clone(), Entry::Message(Arc::new(message)))
        .is_some()
    {
        return Err(DescriptorError::DuplicateName { name: full_name });
    }
    order.push(full_name.clone());
    for nested in &descriptor.messages {
        index_message(&full_name, nested, entries, order)?;
    }
    Ok(())
}

/// A handle binding one message definition to the set it was resolved
/// from, so message-typed fields can themselves be resolved.
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    set: TypeDefinitionSet,
    message: Arc<MessageType>,
}

/// Two handles are equal when they name the same type; the backing sets
/// are not compared.
impl PartialEq for TypeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.message.full_name == other.message.full_name
    }
}

impl TypeDefinition {
    pub fn full_name(&self) -> &str {
        &self.message.full_name
    }

    pub fn name(&self) -> &str {
        &self.message.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.message.doc.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.message.fields
    }

    pub fn constraints(&self) -> &[ExpressionRule] {
        &self.message.constraints
    }

    /// Resolve the definition of a message-typed field within this
    /// definition's set.
    pub fn field_message(&self, field: &FieldDescriptor) -> Option<TypeDefinition> {
        let target = field.message.as_deref()?;
        match self.set.entries.get(target) {
            Some(Entry::Message(message)) => Some(TypeDefinition {
                set: self.set.clone(),
                message: Arc::clone(message),
            }),
            _ => None,
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────

/// A descriptor document that could not be indexed.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("malformed descriptor document: {detail}")]
    Malformed { detail: String },
    #[error("duplicate type name in descriptor set: {name}")]
    DuplicateName { name: String },
    #[error("field {message}.{field} has kind message but names no target type")]
    MissingTarget { message: String, field: String },
    #[error("field {message}.{field} references unknown type {target}")]
    UnresolvedTarget {
        message: String,
        field: String,
        target: String,
    },
}

/// A name lookup that found nothing usable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("type not found: {name}")]
    NotFound { name: String },
    #[error("name {name} does not refer to a message")]
    NotAMessage { name: String },
}
