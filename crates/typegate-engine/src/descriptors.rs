//! The validation-descriptor resource kind.

use typegate_core::descriptor::{LookupError, TypeDefinition};
use typegate_core::name::TypeName;
use typegate_core::registry::LocalTypeRegistry;
use typegate_registry_client::reflect::ReflectClient;
use typegate_registry_client::RegistryError;

use crate::resolver::{LocalFailure, ResourceKind, SchemaSource};

/// Loads type definitions from the compiled-in registry or the remote
/// reflection endpoint.
///
/// One instance is built per request so a caller-supplied version (a
/// commit or label to pin the remote fetch to) can ride along.
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    registry: LocalTypeRegistry,
    reflect: ReflectClient,
    version: Option<String>,
}

impl DescriptorSource {
    pub fn new(
        registry: LocalTypeRegistry,
        reflect: ReflectClient,
        version: Option<String>,
    ) -> Self {
        Self {
            registry,
            reflect,
            version,
        }
    }
}

impl SchemaSource for DescriptorSource {
    type Item = TypeDefinition;
    const KIND: ResourceKind = ResourceKind::ValidationDescriptor;

    fn load_local(&self, name: &TypeName) -> Result<TypeDefinition, LocalFailure> {
        self.registry.definition(name).map_err(|e| match e {
            LookupError::NotFound { name } => LocalFailure::NotFound { name },
            LookupError::NotAMessage { name } => LocalFailure::NotAMessage { name },
        })
    }

    async fn load_remote(&self, name: &TypeName) -> Result<TypeDefinition, RegistryError> {
        let set = self
            .reflect
            .fetch_descriptor_set(&[name.as_str().to_string()], self.version.as_deref())
            .await?;
        // The registry may return a minimal closure; a response that does
        // not cover the requested symbol is a remote miss, not a decode
        // problem.
        set.definition(name).map_err(|_| RegistryError::NotFound {
            what: format!("descriptor {name}"),
        })
    }
}
