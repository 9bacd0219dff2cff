//! Contract tests for ReflectClient against a simulated registry.
//!
//! These tests use wiremock to stand in for the registry's reflection
//! endpoint and pin down the request shape, the response decoding, and
//! the status-code error mapping.

use typegate_core::name::TypeName;
use typegate_registry_client::{RegistryClient, RegistryConfig, RegistryError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(mock_server: &MockServer, token: Option<&str>) -> RegistryConfig {
    RegistryConfig {
        base_url: mock_server.uri().parse().unwrap(),
        owner: "acme".into(),
        module: "types".into(),
        default_label: "main".into(),
        token: token.map(str::to_string),
        timeout_secs: 5,
    }
}

fn descriptor_set_body() -> serde_json::Value {
    serde_json::json!({
        "descriptorSet": {
            "files": [{
                "package": "example",
                "messages": [{
                    "name": "User",
                    "fields": [
                        {"name": "name", "kind": "string", "rules": {"minLen": 3}}
                    ]
                }]
            }]
        },
        "version": "abc123"
    })
}

#[tokio::test]
async fn fetch_sends_module_symbols_and_default_label() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .and(body_partial_json(serde_json::json!({
            "module": format!("{}/acme/types", mock_server.uri().parse::<url::Url>().unwrap().host_str().unwrap()),
            "version": "main",
            "symbols": ["example.User"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(descriptor_set_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let set = client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap();

    let name = TypeName::parse("example.User").unwrap();
    assert!(set.definition(&name).is_ok());
}

#[tokio::test]
async fn fetch_forwards_explicit_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .and(body_partial_json(serde_json::json!({"version": "v1.2.0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(descriptor_set_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], Some("v1.2.0"))
        .await
        .unwrap();
}

#[tokio::test]
async fn fetch_attaches_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(descriptor_set_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, Some("test-token"))).unwrap();
    client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap();
}

#[tokio::test]
async fn status_401_maps_to_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let err = client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized));
}

#[tokio::test]
async fn status_404_maps_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let err = client
        .reflect()
        .fetch_descriptor_set(&["example.Ghost".to_string()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }));
}

#[tokio::test]
async fn unexpected_status_maps_to_status_error_with_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(503).set_body_string("registry melting"))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let err = client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap_err();
    match err {
        RegistryError::Status { status, body, .. } => {
            assert_eq!(status, 503);
            assert!(body.contains("registry melting"));
        }
        other => panic!("expected Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let err = client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Decode { .. }));
}

#[tokio::test]
async fn missing_descriptor_set_maps_to_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reflect.v1.SchemaReflectionService/GetDescriptorSet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"version": "x"})))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new(test_config(&mock_server, None)).unwrap();
    let err = client
        .reflect()
        .fetch_descriptor_set(&["example.User".to_string()], None)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Decode { .. }));
}
