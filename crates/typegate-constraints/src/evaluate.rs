//! Rule evaluation.

use std::collections::HashMap;

use cel_interpreter::{Context, Program, Value};

use typegate_core::descriptor::{ExpressionRule, FieldDescriptor};
use typegate_core::dynamic::{DynamicMessage, DynamicValue};

/// One raw violation as emitted by the evaluator.
///
/// `message` is the rule author's declared text, present only on
/// expression constraints that carry one. `technical` is the evaluator's
/// own diagnostic string and is never post-processed here.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    pub field_path: Option<String>,
    pub constraint_id: String,
    pub message: Option<String>,
    pub technical: String,
}

/// Evaluation could not run to completion.
///
/// Distinct from violations: a payload that breaks rules yields
/// violations; a rule set that cannot be compiled yields this.
#[derive(Debug, thiserror::Error)]
pub enum EvaluatorError {
    #[error("compilation error: failed to compile expression {id}: {detail}")]
    Compilation { id: String, detail: String },
    #[error("compilation error: invalid pattern on field {path}: {detail}")]
    InvalidPattern { path: String, detail: String },
    #[error("runtime error in expression {id}: {detail}")]
    Runtime { id: String, detail: String },
}

/// Evaluate every constraint declared by the message's definition
/// (including definitions of nested message fields, recursively).
///
/// Violations are emitted in a stable order: fields in declaration
/// order (descending into populated nested messages in place), then the
/// message-level expression constraints.
pub fn evaluate(message: &DynamicMessage) -> Result<Vec<ConstraintViolation>, EvaluatorError> {
    let mut violations = Vec::new();
    evaluate_message(message, "", &mut violations)?;
    tracing::debug!(
        type_name = message.definition().full_name(),
        violations = violations.len(),
        "constraint evaluation finished"
    );
    Ok(violations)
}

fn evaluate_message(
    message: &DynamicMessage,
    path: &str,
    violations: &mut Vec<ConstraintViolation>,
) -> Result<(), EvaluatorError> {
    for field in message.definition().fields() {
        let Some(value) = message.get(&field.name) else {
            continue;
        };
        let field_path = join_path(path, &field.name);
        evaluate_field(field, value, &field_path, violations)?;

        // Descend into populated message values so their own rules run.
        match value {
            DynamicValue::Message(nested) => {
                evaluate_message(nested, &field_path, violations)?;
            }
            DynamicValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let DynamicValue::Message(nested) = item {
                        evaluate_message(nested, &format!("{field_path}[{index}]"), violations)?;
                    }
                }
            }
            _ => {}
        }
    }

    for rule in message.definition().constraints() {
        if let Some(violation) = evaluate_expression(rule, message, path)? {
            violations.push(violation);
        }
    }
    Ok(())
}

// ── Declarative field rules ──────────────────────────────────────────

fn evaluate_field(
    field: &FieldDescriptor,
    value: &DynamicValue,
    path: &str,
    violations: &mut Vec<ConstraintViolation>,
) -> Result<(), EvaluatorError> {
    let rules = &field.rules;
    if rules.is_vacuous() {
        return Ok(());
    }
    if rules.ignore_empty && value.is_zero() {
        return Ok(());
    }
    if rules.required && value.is_zero() {
        violations.push(field_violation(
            path,
            "required",
            format!("{path}: value is required [required]"),
        ));
        // A missing value produces one violation, not one per rule.
        return Ok(());
    }

    match value {
        DynamicValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                check_scalar_rules(field, item, &format!("{path}[{index}]"), violations)?;
            }
        }
        other => check_scalar_rules(field, other, path, violations)?,
    }
    Ok(())
}

fn check_scalar_rules(
    field: &FieldDescriptor,
    value: &DynamicValue,
    path: &str,
    violations: &mut Vec<ConstraintViolation>,
) -> Result<(), EvaluatorError> {
    let rules = &field.rules;

    if let DynamicValue::String(s) = value {
        let length = s.chars().count() as u64;
        if let Some(min) = rules.min_len {
            if length < min {
                violations.push(field_violation(
                    path,
                    "string.min_len",
                    format!("{path}: value length must be at least {min} characters [string.min_len]"),
                ));
            }
        }
        if let Some(max) = rules.max_len {
            if length > max {
                violations.push(field_violation(
                    path,
                    "string.max_len",
                    format!("{path}: value length must be at most {max} characters [string.max_len]"),
                ));
            }
        }
        if let Some(pattern) = rules.pattern.as_deref() {
            let re = regex::Regex::new(pattern).map_err(|e| EvaluatorError::InvalidPattern {
                path: path.to_string(),
                detail: e.to_string(),
            })?;
            if !re.is_match(s) {
                violations.push(field_violation(
                    path,
                    "string.pattern",
                    format!("{path}: value does not match regex pattern `{pattern}` [string.pattern]"),
                ));
            }
        }
    }

    if let Some(number) = numeric(value) {
        let kind = field.kind.label();
        if let Some(gte) = rules.gte {
            if number < gte {
                violations.push(field_violation(
                    path,
                    "gte",
                    format!("{path}: value must be greater than or equal to {gte} [{kind}.gte]"),
                ));
            }
        }
        if let Some(lte) = rules.lte {
            if number > lte {
                violations.push(field_violation(
                    path,
                    "lte",
                    format!("{path}: value must be less than or equal to {lte} [{kind}.lte]"),
                ));
            }
        }
    }
    Ok(())
}

fn numeric(value: &DynamicValue) -> Option<f64> {
    match value {
        DynamicValue::Int(i) => Some(*i as f64),
        DynamicValue::Double(d) => Some(*d),
        _ => None,
    }
}

fn field_violation(path: &str, id: &str, technical: String) -> ConstraintViolation {
    ConstraintViolation {
        field_path: Some(path.to_string()),
        constraint_id: id.to_string(),
        message: None,
        technical,
    }
}

// ── Expression constraints ───────────────────────────────────────────

fn evaluate_expression(
    rule: &ExpressionRule,
    message: &DynamicMessage,
    path: &str,
) -> Result<Option<ConstraintViolation>, EvaluatorError> {
    let program =
        Program::compile(&rule.expression).map_err(|e| EvaluatorError::Compilation {
            id: rule.id.clone(),
            detail: e.to_string(),
        })?;

    let mut context = Context::default();
    context.add_variable_from_value("this", to_cel(&DynamicValue::Message(message.clone())));

    match program.execute(&context) {
        Ok(Value::Bool(true)) => Ok(None),
        Ok(Value::Bool(false)) => Ok(Some(ConstraintViolation {
            field_path: if path.is_empty() {
                None
            } else {
                Some(path.to_string())
            },
            constraint_id: rule.id.clone(),
            message: if rule.message.is_empty() {
                None
            } else {
                Some(rule.message.clone())
            },
            technical: format!(
                "message constraint violated: {} [{}]",
                rule.expression, rule.id
            ),
        })),
        Ok(_) => Err(EvaluatorError::Runtime {
            id: rule.id.clone(),
            detail: "expression did not evaluate to a boolean".to_string(),
        }),
        Err(e) => Err(EvaluatorError::Runtime {
            id: rule.id.clone(),
            detail: e.to_string(),
        }),
    }
}

/// Convert a dynamic value into a CEL value. Unset message fields become
/// CEL null, so expressions can test for them.
fn to_cel(value: &DynamicValue) -> Value {
    match value {
        DynamicValue::Null => Value::Null,
        DynamicValue::Bool(b) => Value::from(*b),
        DynamicValue::Int(i) => Value::from(*i),
        DynamicValue::Double(d) => Value::from(*d),
        DynamicValue::String(s) => Value::from(s.clone()),
        DynamicValue::List(items) => Value::from(items.iter().map(to_cel).collect::<Vec<_>>()),
        DynamicValue::Message(m) => {
            let map: HashMap<String, Value> = m
                .iter()
                .map(|(name, value)| (name.to_string(), to_cel(value)))
                .collect();
            Value::from(map)
        }
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typegate_core::descriptor::{DescriptorSet, TypeDefinitionSet};
    use typegate_core::name::TypeName;

    fn definition_set(document: serde_json::Value) -> TypeDefinitionSet {
        let document: DescriptorSet = serde_json::from_value(document).unwrap();
        TypeDefinitionSet::from_document(document).unwrap()
    }

    fn user_set() -> TypeDefinitionSet {
        definition_set(serde_json::json!({
            "files": [{
                "package": "example",
                "messages": [{
                    "name": "User",
                    "fields": [
                        {"name": "name", "kind": "string", "rules": {"required": true, "minLen": 3}},
                        {"name": "email", "kind": "string", "rules": {"pattern": "^[^@\\s]+@[^@\\s]+$", "ignoreEmpty": true}},
                        {"name": "age", "kind": "int", "rules": {"gte": 18, "lte": 130}},
                        {"name": "tags", "kind": "string", "repeated": true, "rules": {"pattern": "^[a-z]+$"}},
                        {"name": "contact_info", "kind": "message", "message": "example.User.ContactInfo"}
                    ],
                    "messages": [{
                        "name": "ContactInfo",
                        "fields": [
                            {"name": "phone", "kind": "string", "rules": {"minLen": 7, "ignoreEmpty": true}}
                        ]
                    }]
                }]
            }]
        }))
    }

    fn decode(set: &TypeDefinitionSet, name: &str, payload: serde_json::Value) -> DynamicMessage {
        let definition = set.definition(&TypeName::parse(name).unwrap()).unwrap();
        DynamicMessage::decode(definition, payload.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn valid_payload_has_no_violations() {
        let set = user_set();
        let message = decode(
            &set,
            "example.User",
            serde_json::json!({"name": "Joe", "age": 18}),
        );
        assert!(evaluate(&message).unwrap().is_empty());
    }

    #[test]
    fn short_name_and_low_age_each_violate() {
        let set = user_set();
        let message = decode(
            &set,
            "example.User",
            serde_json::json!({"name": "Jo", "age": 17}),
        );
        let violations = evaluate(&message).unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field_path.as_deref(), Some("name"));
        assert_eq!(violations[0].constraint_id, "string.min_len");
        assert_eq!(violations[1].field_path.as_deref(), Some("age"));
        assert_eq!(violations[1].constraint_id, "gte");
    }

    #[test]
    fn required_fires_once_for_missing_value() {
        let set = user_set();
        let message = decode(&set, "example.User", serde_json::json!({"age": 20}));
        let violations = evaluate(&message).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_id, "required");
        assert_eq!(violations[0].field_path.as_deref(), Some("name"));
    }

    #[test]
    fn ignore_empty_skips_rules_for_absent_fields() {
        let set = user_set();
        // email is absent -> zero value -> rules skipped.
        let ok = decode(
            &set,
            "example.User",
            serde_json::json!({"name": "Joe", "age": 20}),
        );
        assert!(evaluate(&ok).unwrap().is_empty());
        // email present but malformed -> pattern fires.
        let bad = decode(
            &set,
            "example.User",
            serde_json::json!({"name": "Joe", "age": 20, "email": "nope"}),
        );
        let violations = evaluate(&bad).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_path.as_deref(), Some("email"));
    }

    #[test]
    fn repeated_elements_report_indexed_paths() {
        let set = user_set();
        let message = decode(
            &set,
            "example.User",
            serde_json::json!({"name": "Joe", "age": 20, "tags": ["ok", "Bad"]}),
        );
        let violations = evaluate(&message).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_path.as_deref(), Some("tags[1]"));
    }

    #[test]
    fn nested_message_rules_use_dotted_paths() {
        let set = user_set();
        let message = decode(
            &set,
            "example.User",
            serde_json::json!({
                "name": "Joe",
                "age": 20,
                "contact_info": {"phone": "123"}
            }),
        );
        let violations = evaluate(&message).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_path.as_deref(), Some("contact_info.phone"));
    }

    fn task_set(expression: &str) -> TypeDefinitionSet {
        definition_set(serde_json::json!({
            "files": [{
                "package": "example",
                "messages": [{
                    "name": "Task",
                    "fields": [
                        {"name": "status", "kind": "string"},
                        {"name": "comment", "kind": "string"}
                    ],
                    "constraints": [{
                        "id": "comment_required_if_blocked",
                        "message": "comment is required when status is TASK_STATUS_BLOCKED",
                        "expression": expression
                    }]
                }]
            }]
        }))
    }

    #[test]
    fn expression_constraint_passes_and_fails() {
        let set = task_set("this.status != 'TASK_STATUS_BLOCKED' || this.comment != ''");
        let blocked = decode(
            &set,
            "example.Task",
            serde_json::json!({"status": "TASK_STATUS_BLOCKED"}),
        );
        let violations = evaluate(&blocked).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_id, "comment_required_if_blocked");
        assert_eq!(
            violations[0].message.as_deref(),
            Some("comment is required when status is TASK_STATUS_BLOCKED")
        );
        assert_eq!(violations[0].field_path, None);

        let with_comment = decode(
            &set,
            "example.Task",
            serde_json::json!({"status": "TASK_STATUS_BLOCKED", "comment": "waiting on review"}),
        );
        assert!(evaluate(&with_comment).unwrap().is_empty());
    }

    #[test]
    fn uncompilable_expression_is_an_evaluator_error() {
        let set = task_set("this.status !!!= broken(");
        let message = decode(&set, "example.Task", serde_json::json!({"status": "x"}));
        let err = evaluate(&message).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("compilation error"));
        assert!(text.contains("expression comment_required_if_blocked:"));
    }

    #[test]
    fn non_boolean_expression_is_a_runtime_error() {
        let set = task_set("this.status");
        let message = decode(&set, "example.Task", serde_json::json!({"status": "x"}));
        assert!(matches!(
            evaluate(&message).unwrap_err(),
            EvaluatorError::Runtime { .. }
        ));
    }

    #[test]
    fn invalid_pattern_is_an_evaluator_error() {
        let set = definition_set(serde_json::json!({
            "files": [{
                "package": "example",
                "messages": [{
                    "name": "Thing",
                    "fields": [
                        {"name": "code", "kind": "string", "rules": {"pattern": "([unclosed"}}
                    ]
                }]
            }]
        }));
        let message = decode(&set, "example.Thing", serde_json::json!({"code": "x"}));
        assert!(matches!(
            evaluate(&message).unwrap_err(),
            EvaluatorError::InvalidPattern { .. }
        ));
    }
}
