//! Application configuration.
//!
//! All configuration is read here, once, at startup — no component below
//! the transport layer reads ambient process state. Module coordinates
//! can come from a `registry.yaml` manifest; environment variables
//! override it, and parse failure falls back to compiled defaults with a
//! warning.

use std::path::{Path, PathBuf};

use url::Url;

use typegate_core::mode::ResolutionMode;
use typegate_registry_client::{ModuleCoordinates, RegistryConfig};

const DEFAULT_REGISTRY_URL: &str = "https://registry.typegate.dev";
const DEFAULT_OWNER: &str = "typegate";
const DEFAULT_MODULE: &str = "examples";

/// Startup configuration for the API service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Namespace prefix for the type listing (e.g. `example.`).
    pub namespace_prefix: String,
    /// Directory holding local schema bundles.
    pub bundle_dir: PathBuf,
    /// Resolution mode for schema bundles.
    pub schema_mode: ResolutionMode,
    /// Resolution mode for validation descriptors, configured
    /// independently of the bundle mode.
    pub validation_mode: ResolutionMode,
    /// Remote registry coordinates and credential.
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `TYPE_NAMESPACE` (default: `example.`)
    /// - `SCHEMA_BUNDLE_DIR` (default: `gen/jsonschema`)
    /// - `SCHEMA_SOURCE_MODE` / `VALIDATION_SOURCE_MODE`
    ///   (`local-only` | `remote-only` | `local-then-remote`; unrecognized
    ///   values fall back to `local-then-remote`)
    /// - `REGISTRY_URL` (default: `https://registry.typegate.dev`)
    /// - `REGISTRY_MANIFEST` (default: `registry.yaml`) — supplies
    ///   owner/module unless `REGISTRY_OWNER` / `REGISTRY_MODULE` override
    /// - `REGISTRY_LABEL` (default: `main`)
    /// - `REGISTRY_TOKEN` (optional; absent means anonymous access)
    /// - `REGISTRY_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let manifest_path =
            env_or("REGISTRY_MANIFEST", "registry.yaml");
        let coords = match ModuleCoordinates::from_manifest(Path::new(&manifest_path)) {
            Ok(coords) => coords,
            Err(e) => {
                tracing::warn!(
                    manifest = %manifest_path,
                    error = %e,
                    "no usable registry manifest, using compiled defaults"
                );
                ModuleCoordinates {
                    owner: DEFAULT_OWNER.to_string(),
                    module: DEFAULT_MODULE.to_string(),
                }
            }
        };

        let token = std::env::var("REGISTRY_TOKEN").ok().filter(|t| !t.is_empty());
        if token.is_none() {
            tracing::warn!("REGISTRY_TOKEN is not set; private registry modules may be inaccessible");
        }

        let registry = RegistryConfig {
            base_url: env_url("REGISTRY_URL", DEFAULT_REGISTRY_URL)?,
            owner: env_or("REGISTRY_OWNER", &coords.owner),
            module: env_or("REGISTRY_MODULE", &coords.module),
            default_label: env_or("REGISTRY_LABEL", "main"),
            token,
            timeout_secs: std::env::var("REGISTRY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        };

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            namespace_prefix: env_or("TYPE_NAMESPACE", "example."),
            bundle_dir: PathBuf::from(env_or("SCHEMA_BUNDLE_DIR", "gen/jsonschema")),
            schema_mode: ResolutionMode::from_config(&env_or(
                "SCHEMA_SOURCE_MODE",
                "local-then-remote",
            )),
            validation_mode: ResolutionMode::from_config(&env_or(
                "VALIDATION_SOURCE_MODE",
                "local-then-remote",
            )),
            registry,
        })
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = env_or(var, default);
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
