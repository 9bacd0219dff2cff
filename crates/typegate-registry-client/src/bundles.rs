//! Schema-bundle client.
//!
//! Bundles are self-contained JSON-schema documents generated by the
//! registry for each message type, served at a templated path. The bytes
//! are opaque to this client — they are handed to the UI form renderer
//! as-is.

use typegate_core::name::TypeName;

use crate::config::RegistryConfig;
use crate::error::RegistryError;

/// Client for the registry's generated schema-bundle archive.
#[derive(Debug, Clone)]
pub struct BundleClient {
    http: reqwest::Client,
    config: RegistryConfig,
}

impl BundleClient {
    pub(crate) fn new(http: reqwest::Client, config: RegistryConfig) -> Self {
        Self { http, config }
    }

    /// URL of the bundle for one fully-qualified type name.
    fn bundle_url(&self, name: &TypeName) -> String {
        format!(
            "{}archive/{}/{}/jsonschema/{}/{}.schema.bundle.json",
            self.config.base_url,
            self.config.owner,
            self.config.module,
            self.config.default_label,
            name.as_str(),
        )
    }

    /// Fetch the raw bundle bytes for `name`.
    pub async fn fetch_bundle(&self, name: &TypeName) -> Result<Vec<u8>, RegistryError> {
        let url = self.bundle_url(name);
        let endpoint = format!("GET {url}");
        tracing::debug!(type_name = name.as_str(), url, "fetching schema bundle");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistryError::Transport {
                endpoint: endpoint.clone(),
                source: e,
            })?;
        let response =
            crate::check_status(response, &endpoint, &format!("schema bundle {name}")).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RegistryError::Transport {
                endpoint,
                source: e,
            })?;
        tracing::debug!(
            type_name = name.as_str(),
            size = bytes.len(),
            "fetched schema bundle"
        );
        Ok(bytes.to_vec())
    }
}
