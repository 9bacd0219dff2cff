//! Shared client wiring for subcommands.

use std::path::PathBuf;

use clap::Args;

use typegate_core::mode::ResolutionMode;
use typegate_core::registry::LocalTypeRegistry;
use typegate_engine::bundles::{LocalBundleStore, SchemaService};
use typegate_engine::validate::ValidationEngine;
use typegate_registry_client::{RegistryClient, RegistryConfig};

/// Connection and resolution options shared by all subcommands.
#[derive(Debug, Args)]
pub struct ClientOptions {
    /// Remote registry base URL.
    #[arg(long, default_value = "https://registry.typegate.dev", global = true)]
    pub registry_url: url::Url,

    /// Registry module owner.
    #[arg(long, default_value = "typegate", global = true)]
    pub owner: String,

    /// Registry module name.
    #[arg(long, default_value = "examples", global = true)]
    pub module: String,

    /// Registry label used when no version is given.
    #[arg(long, default_value = "main", global = true)]
    pub label: String,

    /// Bearer token for the registry (falls back to $REGISTRY_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Source resolution mode: local-only, remote-only, local-then-remote.
    #[arg(long, default_value = "local-then-remote", global = true)]
    pub mode: String,

    /// Directory holding local schema bundles.
    #[arg(long, default_value = "gen/jsonschema", global = true)]
    pub bundle_dir: PathBuf,

    /// Namespace prefix for the type listing.
    #[arg(long, default_value = "example.", global = true)]
    pub namespace: String,
}

impl ClientOptions {
    fn registry_config(&self) -> RegistryConfig {
        let token = self
            .token
            .clone()
            .or_else(|| std::env::var("REGISTRY_TOKEN").ok())
            .filter(|t| !t.is_empty());
        RegistryConfig {
            base_url: self.registry_url.clone(),
            owner: self.owner.clone(),
            module: self.module.clone(),
            default_label: self.label.clone(),
            token,
            timeout_secs: 30,
        }
    }

    fn mode(&self) -> ResolutionMode {
        ResolutionMode::from_config(&self.mode)
    }

    /// Build the validation engine with these options.
    pub fn validation_engine(&self) -> anyhow::Result<ValidationEngine> {
        let client = RegistryClient::new(self.registry_config())?;
        Ok(ValidationEngine::new(
            LocalTypeRegistry::compiled(self.namespace.clone()),
            client.reflect().clone(),
            self.mode(),
        ))
    }

    /// Build the schema service with these options.
    pub fn schema_service(&self) -> anyhow::Result<SchemaService> {
        let client = RegistryClient::new(self.registry_config())?;
        Ok(SchemaService::new(
            LocalBundleStore::new(self.bundle_dir.clone()),
            client.bundles().clone(),
            self.mode(),
            LocalTypeRegistry::compiled(self.namespace.clone()),
        ))
    }
}
