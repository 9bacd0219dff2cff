//! End-to-end tests for the validation engine across resolution modes.
//!
//! Remote descriptor resolution is simulated with wiremock; call-count
//! expectations double as proof that a mode did (or did not) touch the
//! network.

use typegate_core::mode::ResolutionMode;
use typegate_core::registry::LocalTypeRegistry;
use typegate_engine::resolver::ResolveError;
use typegate_engine::validate::{ValidateError, ValidationEngine};
use typegate_registry_client::{RegistryClient, RegistryConfig, RegistryError};
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(mock_server: &MockServer, mode: ResolutionMode) -> ValidationEngine {
    let client = RegistryClient::new(RegistryConfig {
        base_url: mock_server.uri().parse().unwrap(),
        owner: "acme".into(),
        module: "types".into(),
        default_label: "main".into(),
        token: None,
        timeout_secs: 5,
    })
    .unwrap();
    ValidationEngine::new(
        LocalTypeRegistry::compiled("example."),
        client.reflect().clone(),
        mode,
    )
}

fn widget_descriptor_body() -> serde_json::Value {
    serde_json::json!({
        "descriptorSet": {
            "files": [{
                "package": "acme",
                "messages": [{
                    "name": "Widget",
                    "fields": [
                        {"name": "label", "kind": "string", "rules": {"required": true, "minLen": 3}}
                    ]
                }]
            }]
        },
        "version": "main"
    })
}

#[tokio::test]
async fn invalid_user_reports_both_field_violations() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let outcome = engine
        .validate("example.User", br#"{"name": "Jo", "age": 17}"#, None)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 2);
    assert!(outcome.errors[0].friendly.contains("name"));
    assert!(outcome.errors[0].technical.contains("string.min_len"));
    assert!(outcome.errors[1].friendly.contains("age"));
    assert!(outcome.errors[1].technical.contains("gte"));
}

#[tokio::test]
async fn valid_user_passes_with_empty_error_list() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let outcome = engine
        .validate("example.User", br#"{"name": "Joe", "age": 18}"#, None)
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.errors.is_empty());
}

#[tokio::test]
async fn validation_is_idempotent_for_identical_input() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);
    let payload = br#"{"name": "Jo", "age": 17}"#;

    let first = engine.validate("example.User", payload, None).await.unwrap();
    let second = engine.validate("example.User", payload, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn unknown_payload_keys_are_discarded() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let bare = engine
        .validate("example.User", br#"{"name": "Joe", "age": 18}"#, None)
        .await
        .unwrap();
    let with_extra = engine
        .validate(
            "example.User",
            br#"{"name": "Joe", "age": 18, "favorite_color": "mauve"}"#,
            None,
        )
        .await
        .unwrap();

    assert_eq!(bare, with_extra);
}

#[tokio::test]
async fn local_only_never_touches_the_network() {
    let mock_server = MockServer::start().await;
    // Any request at all would trip this expectation on drop.
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let engine = engine(&mock_server, ResolutionMode::LocalOnly);
    engine
        .validate("example.User", br#"{"name": "Joe", "age": 18}"#, None)
        .await
        .unwrap();
    let err = engine
        .validate("acme.Widget", br#"{"label": "gear"}"#, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::UnknownSchema { .. }));
}

#[tokio::test]
async fn remote_only_ignores_locally_present_types() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine(&mock_server, ResolutionMode::RemoteOnly);
    // example.User exists in the compiled registry, but RemoteOnly must
    // not consult it.
    let err = engine
        .validate("example.User", br#"{"name": "Joe", "age": 18}"#, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::UnknownSchema { .. }));
}

#[tokio::test]
async fn local_then_remote_falls_back_for_unknown_local_names() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .and(body_partial_json(serde_json::json!({"symbols": ["acme.Widget"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget_descriptor_body()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let engine = engine(&mock_server, ResolutionMode::LocalThenRemote);

    let ok = engine
        .validate("acme.Widget", br#"{"label": "gear"}"#, None)
        .await
        .unwrap();
    assert!(ok.success);

    let bad = engine
        .validate("acme.Widget", br#"{"label": "no"}"#, None)
        .await
        .unwrap();
    assert!(!bad.success);
    assert_eq!(bad.errors.len(), 1);
    assert!(bad.errors[0].friendly.contains("label"));
}

#[tokio::test]
async fn version_is_forwarded_to_the_remote_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .and(body_partial_json(serde_json::json!({"version": "commit-abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget_descriptor_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let engine = engine(&mock_server, ResolutionMode::RemoteOnly);
    engine
        .validate("acme.Widget", br#"{"label": "gear"}"#, Some("commit-abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn remote_401_surfaces_as_unauthorized_not_unknown_schema() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let engine = engine(&mock_server, ResolutionMode::LocalThenRemote);
    let err = engine
        .validate("acme.Widget", br#"{"label": "gear"}"#, None)
        .await
        .unwrap_err();
    match err {
        ValidateError::Resolution(ResolveError::Registry(RegistryError::Unauthorized)) => {}
        other => panic!("expected Unauthorized, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let err = engine
        .validate("example.User", b"{not json", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::DecodeFailure(_)));

    // A kind mismatch aborts before evaluation as well.
    let err = engine
        .validate("example.User", br#"{"age": "seventeen"}"#, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::DecodeFailure(_)));
}

#[tokio::test]
async fn malformed_type_name_is_unknown_schema() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let err = engine
        .validate("NoPackage", br#"{}"#, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidateError::UnknownSchema { .. }));
}

#[tokio::test]
async fn blocked_task_without_comment_uses_declared_message() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    let outcome = engine
        .validate(
            "example.Task",
            br#"{"title": "ship it", "status": "TASK_STATUS_BLOCKED"}"#,
            None,
        )
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors[0].friendly,
        "comment is required when status is TASK_STATUS_BLOCKED"
    );

    let outcome = engine
        .validate(
            "example.Task",
            br#"{"title": "ship it", "status": "TASK_STATUS_BLOCKED", "comment": "waiting"}"#,
            None,
        )
        .await
        .unwrap();
    assert!(outcome.success);
}

#[tokio::test]
async fn absent_optional_field_with_constraints_fails_as_documented() {
    let mock_server = MockServer::start().await;
    let engine = engine(&mock_server, ResolutionMode::LocalOnly);

    // Task.status carries `required` but no ignore_empty: leaving it out
    // of the payload zero-values it and the constraint still fires. The
    // absent-vs-empty collapse is intended behavior.
    let outcome = engine
        .validate("example.Task", br#"{"title": "ship it"}"#, None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert!(outcome
        .errors
        .iter()
        .any(|e| e.technical.contains("status")));
}
