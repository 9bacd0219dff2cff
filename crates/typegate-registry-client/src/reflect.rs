//! Descriptor reflection client.
//!
//! Fetches the descriptor closure for named symbols from the registry's
//! reflection endpoint. The registry is permitted to return a minimal
//! closure rather than the whole module, so requests always name the
//! specific symbols needed.

use serde::{Deserialize, Serialize};

use typegate_core::descriptor::{DescriptorSet, TypeDefinitionSet};

use crate::config::RegistryConfig;
use crate::error::RegistryError;

const ENDPOINT: &str = "reflect.v1.SchemaReflectionService/GetDescriptorSet";

/// Request body for the reflection endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetDescriptorSetRequest<'a> {
    module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    symbols: &'a [String],
}

/// Response body. The descriptor set travels as a nested JSON document
/// and is decoded separately.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetDescriptorSetResponse {
    #[serde(default)]
    descriptor_set: Option<serde_json::Value>,
    #[serde(default)]
    version: Option<String>,
}

/// Client for the registry reflection surface.
#[derive(Debug, Clone)]
pub struct ReflectClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl ReflectClient {
    pub(crate) fn new(http: reqwest::Client, config: RegistryConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the descriptor set covering `symbols`.
    ///
    /// `version` overrides the configured default label when given.
    pub async fn fetch_descriptor_set(
        &self,
        symbols: &[String],
        version: Option<&str>,
    ) -> Result<TypeDefinitionSet, RegistryError> {
        let url = format!("{}{ENDPOINT}", self.config.base_url);
        let request = GetDescriptorSetRequest {
            module: self.config.module_ref(),
            version: version.or(Some(self.config.default_label.as_str())),
            symbols,
        };
        tracing::debug!(
            module = %request.module,
            version = ?request.version,
            ?symbols,
            "fetching descriptor set from registry"
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RegistryError::Transport {
                endpoint: ENDPOINT.into(),
                source: e,
            })?;
        let response = crate::check_status(response, ENDPOINT, "descriptor set").await?;

        let body: GetDescriptorSetResponse =
            response.json().await.map_err(|e| RegistryError::Decode {
                endpoint: ENDPOINT.into(),
                detail: e.to_string(),
            })?;

        let raw = body.descriptor_set.ok_or_else(|| RegistryError::Decode {
            endpoint: ENDPOINT.into(),
            detail: "descriptorSet is missing from the response".into(),
        })?;
        let document: DescriptorSet =
            serde_json::from_value(raw).map_err(|e| RegistryError::Decode {
                endpoint: ENDPOINT.into(),
                detail: e.to_string(),
            })?;
        let set = TypeDefinitionSet::from_document(document).map_err(|e| RegistryError::Decode {
            endpoint: ENDPOINT.into(),
            detail: e.to_string(),
        })?;

        tracing::debug!(version = ?body.version, "decoded descriptor set from registry");
        Ok(set)
    }
}
