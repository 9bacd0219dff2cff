//! Compiled-in type registry.
//!
//! The local source for validation descriptors: a descriptor document
//! embedded at build time, indexed once per process. Alongside exact-name
//! lookup it supports enumeration for UI pickers — a depth-first walk over
//! every message (nested ones included), filtered to a namespace prefix
//! and de-duplicated by fully-qualified name.

use std::sync::OnceLock;

use serde::Serialize;

use crate::descriptor::{LookupError, TypeDefinition, TypeDefinitionSet};
use crate::name::TypeName;

static EMBEDDED_JSON: &str = include_str!("../descriptors/embedded.types.json");
static EMBEDDED: OnceLock<TypeDefinitionSet> = OnceLock::new();

/// The process-wide compiled-in definition set.
///
/// # Panics
///
/// Panics if the embedded descriptor document is malformed — that is a
/// build-time defect, not a runtime condition.
pub fn compiled() -> &'static TypeDefinitionSet {
    EMBEDDED.get_or_init(|| {
        TypeDefinitionSet::from_json(EMBEDDED_JSON.as_bytes())
            .expect("embedded descriptor document is well-formed")
    })
}

/// One enumerated type, shaped for UI pickers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    /// Display name: the short name with spaces before internal capitals.
    pub name: String,
    /// The author's doc comment, or a synthesized fallback.
    pub description: String,
    pub fully_qualified_name: String,
}

/// Adapter over a definition set restricted to one namespace.
#[derive(Debug, Clone)]
pub struct LocalTypeRegistry {
    set: TypeDefinitionSet,
    namespace_prefix: String,
}

impl LocalTypeRegistry {
    pub fn new(set: TypeDefinitionSet, namespace_prefix: impl Into<String>) -> Self {
        Self {
            set,
            namespace_prefix: namespace_prefix.into(),
        }
    }

    /// Adapter over the compiled-in set.
    pub fn compiled(namespace_prefix: impl Into<String>) -> Self {
        Self::new(crate::registry::compiled().clone(), namespace_prefix)
    }

    pub fn set(&self) -> &TypeDefinitionSet {
        &self.set
    }

    /// Exact-name lookup against the registry.
    pub fn definition(&self, name: &TypeName) -> Result<TypeDefinition, LookupError> {
        self.set.definition(name)
    }

    /// Enumerate every message in the configured namespace.
    ///
    /// Walks depth-first so nested messages are listed after their parent,
    /// skips names outside the namespace prefix (while still descending
    /// into their children), and lists each fully-qualified name once.
    pub fn list_types(&self) -> Vec<TypeSummary> {
        let mut seen = std::collections::HashSet::new();
        let mut summaries = Vec::new();
        for definition in self.set.iter_messages() {
            let full_name = definition.full_name();
            if !full_name.starts_with(&self.namespace_prefix) {
                tracing::debug!(type_name = full_name, "skipping type outside namespace");
                continue;
            }
            if !seen.insert(full_name.to_string()) {
                continue;
            }
            summaries.push(TypeSummary {
                name: spaced_name(definition.name()),
                description: describe(&definition),
                fully_qualified_name: full_name.to_string(),
            });
        }
        tracing::debug!(count = summaries.len(), "enumerated registry types");
        summaries
    }
}

fn describe(definition: &TypeDefinition) -> String {
    if let Some(doc) = definition.doc() {
        let cleaned = clean_doc(doc);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }
    format!("{} message", spaced_name(definition.name()))
}

/// Strip comment markers and surrounding whitespace from a leading doc
/// comment, joining its lines with single spaces.
fn clean_doc(doc: &str) -> String {
    let mut parts = Vec::new();
    for line in doc.lines() {
        let mut line = line.trim();
        line = line.strip_prefix("//").unwrap_or(line);
        line = line.strip_prefix("/*").unwrap_or(line);
        line = line.strip_suffix("*/").unwrap_or(line);
        let line = line.trim();
        if !line.is_empty() {
            parts.push(line);
        }
    }
    parts.join(" ")
}

/// `SimpleUser` becomes `Simple User`: a space before each internal
/// capital letter.
fn spaced_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_registry_contains_user() {
        let registry = LocalTypeRegistry::compiled("example.");
        let name = TypeName::parse("example.User").unwrap();
        let definition = registry.definition(&name).unwrap();
        assert_eq!(definition.full_name(), "example.User");
        assert!(definition.fields().iter().any(|f| f.name == "age"));
    }

    #[test]
    fn enum_lookup_reports_not_a_message() {
        let registry = LocalTypeRegistry::compiled("example.");
        let name = TypeName::parse("example.TaskStatus").unwrap();
        assert!(matches!(
            registry.definition(&name),
            Err(LookupError::NotAMessage { .. })
        ));
    }

    #[test]
    fn list_types_filters_namespace_and_includes_nested() {
        let registry = LocalTypeRegistry::compiled("example.");
        let summaries = registry.list_types();
        let names: Vec<&str> = summaries
            .iter()
            .map(|s| s.fully_qualified_name.as_str())
            .collect();
        assert!(names.contains(&"example.User"));
        assert!(names.contains(&"example.User.ContactInfo"));
        assert!(names.contains(&"example.Task"));
        assert!(!names.iter().any(|n| n.starts_with("internal.")));
    }

    #[test]
    fn list_types_lists_each_name_once() {
        let registry = LocalTypeRegistry::compiled("example.");
        let summaries = registry.list_types();
        let mut names: Vec<&str> = summaries
            .iter()
            .map(|s| s.fully_qualified_name.as_str())
            .collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn description_prefers_cleaned_doc_comment() {
        let registry = LocalTypeRegistry::compiled("example.");
        let summaries = registry.list_types();
        let user = summaries
            .iter()
            .find(|s| s.fully_qualified_name == "example.User")
            .unwrap();
        assert_eq!(user.description, "A registered user of the system.");
        // Task's doc carries a comment marker that must be stripped.
        let task = summaries
            .iter()
            .find(|s| s.fully_qualified_name == "example.Task")
            .unwrap();
        assert_eq!(task.description, "A tracked unit of work.");
    }

    #[test]
    fn description_falls_back_to_spaced_name() {
        let registry = LocalTypeRegistry::compiled("example.");
        let summaries = registry.list_types();
        let contact = summaries
            .iter()
            .find(|s| s.fully_qualified_name == "example.User.ContactInfo")
            .unwrap();
        assert_eq!(contact.name, "Contact Info");
        assert_eq!(contact.description, "Contact Info message");
    }

    #[test]
    fn spaced_name_inserts_internal_spaces_only() {
        assert_eq!(spaced_name("SimpleUser"), "Simple User");
        assert_eq!(spaced_name("User"), "User");
        assert_eq!(spaced_name("HTTPServer"), "H T T P Server");
    }
}
