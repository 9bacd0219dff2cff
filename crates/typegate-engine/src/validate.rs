//! The dynamic validation engine.

use serde::{Deserialize, Serialize};

use typegate_core::dynamic::{DecodeError, DynamicMessage};
use typegate_core::mode::ResolutionMode;
use typegate_core::name::TypeName;
use typegate_core::registry::LocalTypeRegistry;
use typegate_registry_client::reflect::ReflectClient;

use crate::descriptors::DescriptorSource;
use crate::humanize::{humanize, humanize_failure, ValidationError};
use crate::resolver::{ResolveError, SourceResolver};

/// The result of one validation call.
///
/// A populated error list with `success: false` is a *normal* outcome —
/// the payload was understood and judged. Only resolution and decode
/// problems surface as [`ValidateError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub success: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    fn passed() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    fn failed(errors: Vec<ValidationError>) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

/// A validation call that could not run.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The schema name could not be resolved to a message definition.
    /// All unknown-name resolution failures collapse here — the caller
    /// does not need to know the internal resolution topology.
    #[error("unknown schema name: {name}")]
    UnknownSchema { name: String },
    /// The payload could not be decoded against the definition. Reported
    /// before constraint evaluation, never mixed into the error list.
    #[error("failed to decode payload: {0}")]
    DecodeFailure(#[from] DecodeError),
    /// A hard resolution failure that is not an unknown name (credential,
    /// transport, unexpected status, undecodable registry response).
    #[error(transparent)]
    Resolution(ResolveError),
}

/// Validates JSON payloads against dynamically-resolved type definitions.
///
/// Stateless across calls: each validation builds a fresh request-scoped
/// [`DynamicMessage`] and discards it, so calls may run fully in
/// parallel.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    registry: LocalTypeRegistry,
    reflect: ReflectClient,
    resolver: SourceResolver,
}

impl ValidationEngine {
    pub fn new(registry: LocalTypeRegistry, reflect: ReflectClient, mode: ResolutionMode) -> Self {
        Self {
            registry,
            reflect,
            resolver: SourceResolver::new(mode),
        }
    }

    /// Validate `payload` against the type named `raw_name`.
    ///
    /// `version` pins the remote descriptor fetch to a specific commit or
    /// label; `None` uses the registry client's default label.
    pub async fn validate(
        &self,
        raw_name: &str,
        payload: &[u8],
        version: Option<&str>,
    ) -> Result<ValidationOutcome, ValidateError> {
        tracing::debug!(type_name = raw_name, mode = %self.resolver.mode(), "validation requested");

        let name = TypeName::parse(raw_name).map_err(|e| {
            tracing::debug!(type_name = raw_name, error = %e, "malformed schema name");
            ValidateError::UnknownSchema {
                name: raw_name.to_string(),
            }
        })?;

        let source = DescriptorSource::new(
            self.registry.clone(),
            self.reflect.clone(),
            version.map(str::to_string),
        );
        let definition = self
            .resolver
            .resolve(&source, &name)
            .await
            .map_err(|e| {
                if e.is_unknown_name() {
                    tracing::debug!(type_name = raw_name, error = %e, "descriptor resolution miss");
                    ValidateError::UnknownSchema {
                        name: raw_name.to_string(),
                    }
                } else {
                    tracing::warn!(type_name = raw_name, error = %e, "descriptor resolution failed");
                    ValidateError::Resolution(e)
                }
            })?
            .into_inner();

        let message = DynamicMessage::decode(definition, payload)?;

        let outcome = match typegate_constraints::evaluate(&message) {
            Ok(violations) if violations.is_empty() => ValidationOutcome::passed(),
            Ok(violations) => {
                ValidationOutcome::failed(violations.iter().map(humanize).collect())
            }
            Err(failure) => {
                // The evaluator could not run at all; surface its message
                // as the single reported error.
                ValidationOutcome::failed(vec![humanize_failure(&failure.to_string())])
            }
        };

        if outcome.success {
            tracing::info!(type_name = raw_name, "validation succeeded");
        } else {
            tracing::info!(
                type_name = raw_name,
                errors = outcome.errors.len(),
                "validation failed"
            );
        }
        Ok(outcome)
    }
}
