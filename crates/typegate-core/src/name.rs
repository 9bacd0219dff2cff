//! Fully-qualified type names.
//!
//! A type name is a dotted identifier like `example.User` or
//! `example.User.ContactInfo`. Names are validated once, at the API
//! boundary, before any source (local registry, remote reflection) is
//! consulted — a malformed name never reaches a lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A validated, fully-qualified type name (`package.Message`).
///
/// Invariants, enforced by [`TypeName::parse`]:
/// - non-empty
/// - contains at least one dot
/// - every dot-separated segment matches `[A-Za-z_][A-Za-z0-9_]*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    /// Parse and validate a fully-qualified type name.
    pub fn parse(raw: &str) -> Result<Self, InvalidTypeName> {
        if raw.is_empty() {
            return Err(InvalidTypeName::Empty);
        }
        if !raw.contains('.') {
            return Err(InvalidTypeName::MissingPackage {
                name: raw.to_string(),
            });
        }
        for segment in raw.split('.') {
            if !is_identifier(segment) {
                return Err(InvalidTypeName::BadSegment {
                    name: raw.to_string(),
                    segment: segment.to_string(),
                });
            }
        }
        Ok(Self(raw.to_string()))
    }

    /// The full dotted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final segment (the message's short name).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TypeName {
    type Error = InvalidTypeName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

/// A type name that failed validation. Never reaches any source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidTypeName {
    #[error("type name cannot be empty")]
    Empty,
    #[error("type name must be in 'package.Message' format, got: {name}")]
    MissingPackage { name: String },
    #[error("type name {name} contains invalid segment '{segment}'")]
    BadSegment { name: String, segment: String },
}
