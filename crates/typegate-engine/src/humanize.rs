//! Violation humanization.
//!
//! Turns raw constraint-violation records into `{friendly, technical}`
//! pairs. The friendly half is for the form user; the technical half is
//! the untouched original string, kept for expandable diagnostics so no
//! second round trip is needed.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use typegate_constraints::ConstraintViolation;

/// One reported validation error: a human-readable message paired with
/// the raw technical text it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub friendly: String,
    pub technical: String,
}

/// Build the error pair for one violation. First match wins:
///
/// 1. field path + declared message — `field '<path>': <message>`
/// 2. declared message alone — used verbatim
/// 3. neither — classify and clean up the technical string
pub fn humanize(violation: &ConstraintViolation) -> ValidationError {
    let friendly = match (&violation.field_path, &violation.message) {
        (Some(path), Some(message)) => format!("field '{path}': {message}"),
        (None, Some(message)) => message.clone(),
        _ => make_friendly(&violation.technical),
    };
    ValidationError {
        friendly,
        technical: violation.technical.clone(),
    }
}

/// Build the single error pair synthesized when the evaluator itself
/// fails without producing structured violations.
pub fn humanize_failure(technical: &str) -> ValidationError {
    ValidationError {
        friendly: make_friendly(technical),
        technical: technical.to_string(),
    }
}

/// Derive a friendly message from a raw technical string.
///
/// Whatever path is taken, the result is never empty: a technical string
/// that is itself empty (which the evaluator does not produce, but
/// nothing here relies on that) yields a generic message.
fn make_friendly(technical: &str) -> String {
    let friendly = if technical.contains("compilation error") {
        match extract_constraint_id(technical) {
            Some(id) => constraint_id_to_friendly(&id),
            None => cleanup_technical(technical),
        }
    } else {
        cleanup_technical(technical)
    };
    if friendly.trim().is_empty() {
        "Validation failed".to_string()
    } else {
        friendly
    }
}

/// Pull the constraint identifier out of an expression-compilation
/// failure ("… failed to compile expression <id>: …").
fn extract_constraint_id(message: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"compilation error:.*expression\s+([a-zA-Z_][a-zA-Z0-9_]*):")
            .expect("hard-coded pattern compiles")
    });
    re.captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Map known constraint identifiers to hand-written text; synthesize a
/// readable fallback for the rest.
fn constraint_id_to_friendly(id: &str) -> String {
    match id {
        "comment_required_if_blocked" => {
            "comment is required when status is TASK_STATUS_BLOCKED".to_string()
        }
        other => {
            let readable = other.replace('_', " ").to_lowercase();
            format!("Validation failed: {readable}")
        }
    }
}

/// Generic cleanup for technical strings: strip a leading `ERROR:`
/// prefix, embedded `<input>:line:col:` locators, and a trailing
/// `(in container '…')` suffix. Falls back to the original when cleanup
/// changes nothing or empties the string — the friendly message is never
/// empty.
fn cleanup_technical(technical: &str) -> String {
    static ERROR_PREFIX: OnceLock<Regex> = OnceLock::new();
    static LOCATOR: OnceLock<Regex> = OnceLock::new();
    static CONTAINER: OnceLock<Regex> = OnceLock::new();

    let error_prefix = ERROR_PREFIX
        .get_or_init(|| Regex::new(r"(?i)^ERROR:\s*").expect("hard-coded pattern compiles"));
    let locator = LOCATOR
        .get_or_init(|| Regex::new(r"<input>:\d+:\d+:\s*").expect("hard-coded pattern compiles"));
    let container = CONTAINER.get_or_init(|| {
        Regex::new(r"\s*\(in container '[^']*'\)").expect("hard-coded pattern compiles")
    });

    let cleaned = error_prefix.replace(technical, "");
    let cleaned = locator.replace_all(&cleaned, "");
    let cleaned = container.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned == technical {
        technical.to_string()
    } else {
        cleaned.to_string()
    }
}
