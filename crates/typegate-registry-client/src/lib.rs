//! # typegate-registry-client — typed HTTP client for the schema registry
//!
//! Provides access to the three remote registry surfaces typegate
//! consumes:
//!
//! - **Reflection** via `POST /reflect.v1.SchemaReflectionService/GetDescriptorSet`
//!   — fetch the descriptor closure for named symbols.
//! - **Schema bundles** via `GET /archive/{owner}/{module}/jsonschema/{label}/{name}.schema.bundle.json`
//!   — raw JSON-schema documents for UI form generation.
//! - **Label history** via `POST /registry.v1.LabelService/ListLabelHistory`
//!   — paginated commit history for a label.
//!
//! ## Architecture
//!
//! This crate is the only path from typegate to the remote registry.
//! Calls are independent and stateless; there is no caching and no retry
//! logic — failures surface immediately as [`RegistryError`].

pub mod bundles;
pub mod commits;
pub mod config;
pub mod error;
pub mod reflect;

pub use config::{ManifestError, ModuleCoordinates, RegistryConfig};
pub use error::RegistryError;

use std::time::Duration;

/// Top-level registry client. Holds sub-clients for each surface.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    reflect: reflect::ReflectClient,
    bundles: bundles::BundleClient,
    commits: commits::CommitsClient,
}

impl RegistryClient {
    /// Create a new registry client from configuration.
    ///
    /// When a token is configured it is attached as a bearer credential to
    /// every request; when absent the client degrades to anonymous access,
    /// which the registry may reject for private resources.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        if config.token.is_none() {
            tracing::warn!(
                registry = %config.base_url,
                "no registry token configured; requests to private modules may fail"
            );
        }

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(token) = config.token.as_deref() {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| RegistryError::Decode {
                    endpoint: "client_init".into(),
                    detail: "registry token contains non-header characters".into(),
                })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }
        let http = builder.build().map_err(|e| RegistryError::Transport {
            endpoint: "client_init".into(),
            source: e,
        })?;

        Ok(Self {
            reflect: reflect::ReflectClient::new(http.clone(), config.clone()),
            bundles: bundles::BundleClient::new(http.clone(), config.clone()),
            commits: commits::CommitsClient::new(http, config),
        })
    }

    /// Access the descriptor reflection client.
    pub fn reflect(&self) -> &reflect::ReflectClient {
        &self.reflect
    }

    /// Access the schema-bundle client.
    pub fn bundles(&self) -> &bundles::BundleClient {
        &self.bundles
    }

    /// Access the label commit-history client.
    pub fn commits(&self) -> &commits::CommitsClient {
        &self.commits
    }
}

/// Map a non-2xx response to the matching [`RegistryError`].
///
/// Shared by every sub-client so the 401/404/other mapping stays uniform.
pub(crate) async fn check_status(
    response: reqwest::Response,
    endpoint: &str,
    what: &str,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();
    tracing::debug!(endpoint, status = status.as_u16(), "registry response");
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(RegistryError::Unauthorized);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound {
            what: what.to_string(),
        });
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RegistryError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
