//! # Application State
//!
//! Shared state for the Axum application: the validation engine, the
//! schema service, and the commit-history client, all constructed once
//! at startup from [`AppConfig`]. Everything here is cheap to clone and
//! read-only per request.

use typegate_core::registry::LocalTypeRegistry;
use typegate_engine::bundles::{LocalBundleStore, SchemaService};
use typegate_engine::validate::ValidationEngine;
use typegate_registry_client::commits::CommitsClient;
use typegate_registry_client::{RegistryClient, RegistryError};

use crate::config::AppConfig;

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub validation: ValidationEngine,
    pub schemas: SchemaService,
    pub commits: CommitsClient,
}

impl AppState {
    /// Wire up all services from configuration.
    pub fn new(config: &AppConfig) -> Result<Self, RegistryError> {
        let client = RegistryClient::new(config.registry.clone())?;
        let registry = LocalTypeRegistry::compiled(config.namespace_prefix.clone());

        Ok(Self {
            validation: ValidationEngine::new(
                registry.clone(),
                client.reflect().clone(),
                config.validation_mode,
            ),
            schemas: SchemaService::new(
                LocalBundleStore::new(config.bundle_dir.clone()),
                client.bundles().clone(),
                config.schema_mode,
                registry,
            ),
            commits: client.commits().clone(),
        })
    }
}
