//! The schema-bundle resource kind and the schema service built on it.
//!
//! Bundles are the machine-readable JSON-schema documents the UI form
//! renderer consumes. Locally they live on disk, one file per
//! fully-qualified name; remotely they come from the registry's archive
//! endpoint.

use std::path::PathBuf;

use typegate_core::mode::ResolutionMode;
use typegate_core::name::TypeName;
use typegate_core::registry::{LocalTypeRegistry, TypeSummary};
use typegate_registry_client::bundles::BundleClient;
use typegate_registry_client::RegistryError;

use crate::resolver::{LocalFailure, ResolveError, ResourceKind, SchemaSource, SourceResolver};

/// File-based bundle lookup keyed by fully-qualified name.
#[derive(Debug, Clone)]
pub struct LocalBundleStore {
    dir: PathBuf,
}

impl LocalBundleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn bundle_path(&self, name: &TypeName) -> PathBuf {
        self.dir.join(format!("{}.schema.bundle.json", name.as_str()))
    }

    /// Read the bundle for `name`. "Not found" and "unreadable" are kept
    /// apart for diagnostics but are the same kind of miss to callers.
    pub fn load(&self, name: &TypeName) -> Result<Vec<u8>, LocalFailure> {
        let path = self.bundle_path(name);
        tracing::debug!(path = %path.display(), "checking local schema bundle");
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LocalFailure::NotFound {
                name: name.as_str().to_string(),
            },
            _ => LocalFailure::Unreadable {
                name: name.as_str().to_string(),
                detail: e.to_string(),
            },
        })
    }
}

/// Loads schema bundles from disk or the registry archive.
#[derive(Debug, Clone)]
pub struct BundleSource {
    store: LocalBundleStore,
    client: BundleClient,
}

impl BundleSource {
    pub fn new(store: LocalBundleStore, client: BundleClient) -> Self {
        Self { store, client }
    }
}

impl SchemaSource for BundleSource {
    type Item = Vec<u8>;
    const KIND: ResourceKind = ResourceKind::SchemaBundle;

    fn load_local(&self, name: &TypeName) -> Result<Vec<u8>, LocalFailure> {
        self.store.load(name)
    }

    async fn load_remote(&self, name: &TypeName) -> Result<Vec<u8>, RegistryError> {
        self.client.fetch_bundle(name).await
    }
}

/// Serves schema bundles and the type listing to the transport layer.
#[derive(Debug, Clone)]
pub struct SchemaService {
    source: BundleSource,
    resolver: SourceResolver,
    registry: LocalTypeRegistry,
}

impl SchemaService {
    pub fn new(
        store: LocalBundleStore,
        client: BundleClient,
        mode: ResolutionMode,
        registry: LocalTypeRegistry,
    ) -> Self {
        Self {
            source: BundleSource::new(store, client),
            resolver: SourceResolver::new(mode),
            registry,
        }
    }

    /// Fetch the JSON-schema bundle for `raw_name`.
    ///
    /// The name is validated before any source is touched.
    pub async fn get_schema(&self, raw_name: &str) -> Result<Vec<u8>, ResolveError> {
        let name = TypeName::parse(raw_name)?;
        let bytes = self
            .resolver
            .resolve(&self.source, &name)
            .await?
            .into_inner();

        // Bundles are opaque, but a document that is not even JSON is
        // worth a warning before it reaches the form renderer.
        if serde_json::from_slice::<serde_json::Value>(&bytes).is_err() {
            tracing::warn!(type_name = raw_name, "schema bundle is not valid JSON");
        }
        tracing::info!(type_name = raw_name, size = bytes.len(), "served schema bundle");
        Ok(bytes)
    }

    /// Enumerate the registry's message types for UI pickers.
    pub fn list_types(&self) -> Vec<TypeSummary> {
        self.registry.list_types()
    }
}
