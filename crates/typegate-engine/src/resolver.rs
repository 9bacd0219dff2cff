//! Mode-driven source resolution.
//!
//! One generic resolver serves both resource kinds (schema bundles and
//! validation descriptors): the local/remote/fallback branching lives
//! here exactly once, and each kind plugs in as a [`SchemaSource`]
//! implementation. Names are validated before this module is reached —
//! resolution only ever sees a well-formed [`TypeName`].

use std::fmt;

use typegate_core::mode::ResolutionMode;
use typegate_core::name::{InvalidTypeName, TypeName};
use typegate_registry_client::RegistryError;

/// Which resource a resolution is for. Only used in diagnostics — the
/// branching below is identical for both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    SchemaBundle,
    ValidationDescriptor,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SchemaBundle => "schema bundle",
            Self::ValidationDescriptor => "validation descriptor",
        };
        f.write_str(s)
    }
}

/// A resource kind that can be loaded from a local source and a remote
/// registry.
pub trait SchemaSource {
    type Item;
    const KIND: ResourceKind;

    fn load_local(&self, name: &TypeName) -> Result<Self::Item, LocalFailure>;
    fn load_remote(
        &self,
        name: &TypeName,
    ) -> impl std::future::Future<Output = Result<Self::Item, RegistryError>> + Send;
}

/// Why the local source could not satisfy a lookup.
///
/// Within `LocalThenRemote`, a read error is deliberately treated like a
/// plain miss: good data may still sit upstream, and callers should not
/// see local infrastructure faults when it does.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocalFailure {
    #[error("not found locally: {name}")]
    NotFound { name: String },
    #[error("local source unreadable for {name}: {detail}")]
    Unreadable { name: String, detail: String },
    #[error("name {name} does not refer to a message")]
    NotAMessage { name: String },
}

/// A successfully resolved item, tagged with the source that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    Local(T),
    Remote(T),
}

impl<T> Resolved<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Local(item) | Self::Remote(item) => item,
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }
}

/// Resolution failed for every source the mode allows.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The name failed validation; no source was touched.
    #[error("invalid type name: {0}")]
    InvalidName(#[from] InvalidTypeName),
    /// `LocalOnly` and the local source had nothing usable.
    #[error("{kind} {name} not found locally")]
    NotFoundLocal {
        kind: ResourceKind,
        name: String,
        #[source]
        cause: LocalFailure,
    },
    /// `RemoteOnly` and the registry had nothing.
    #[error("{kind} {name} not found in remote registry")]
    NotFoundRemote {
        kind: ResourceKind,
        name: String,
        #[source]
        cause: RegistryError,
    },
    /// `LocalThenRemote` exhausted both sources; both causes kept for
    /// diagnostics.
    #[error("{kind} {name} not found locally ({local}) nor in remote registry ({remote})")]
    NotFoundAnywhere {
        kind: ResourceKind,
        name: String,
        local: LocalFailure,
        remote: RegistryError,
    },
    /// The name resolved to something other than a message.
    #[error("name {name} does not refer to a message")]
    NotAMessage { name: String },
    /// A hard registry failure (credential, transport, unexpected status,
    /// undecodable response) that is not a plain "not found".
    #[error(transparent)]
    Registry(RegistryError),
}

/// Applies one [`ResolutionMode`] to a [`SchemaSource`].
#[derive(Debug, Clone, Copy)]
pub struct SourceResolver {
    mode: ResolutionMode,
}

impl SourceResolver {
    pub fn new(mode: ResolutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Resolve `name` through `source` according to the configured mode.
    pub async fn resolve<S: SchemaSource>(
        &self,
        source: &S,
        name: &TypeName,
    ) -> Result<Resolved<S::Item>, ResolveError> {
        let kind = S::KIND;
        tracing::debug!(%kind, name = name.as_str(), mode = %self.mode, "resolving");

        let resolved = match self.mode {
            ResolutionMode::LocalOnly => match source.load_local(name) {
                Ok(item) => Ok(Resolved::Local(item)),
                Err(LocalFailure::NotAMessage { name }) => {
                    Err(ResolveError::NotAMessage { name })
                }
                Err(cause) => Err(ResolveError::NotFoundLocal {
                    kind,
                    name: name.as_str().to_string(),
                    cause,
                }),
            },
            ResolutionMode::RemoteOnly => match source.load_remote(name).await {
                Ok(item) => Ok(Resolved::Remote(item)),
                Err(cause) if cause.is_not_found() => Err(ResolveError::NotFoundRemote {
                    kind,
                    name: name.as_str().to_string(),
                    cause,
                }),
                Err(cause) => Err(ResolveError::Registry(cause)),
            },
            ResolutionMode::LocalThenRemote => match source.load_local(name) {
                Ok(item) => Ok(Resolved::Local(item)),
                Err(local) => {
                    tracing::debug!(
                        %kind,
                        name = name.as_str(),
                        %local,
                        "local miss, falling back to remote registry"
                    );
                    match source.load_remote(name).await {
                        Ok(item) => Ok(Resolved::Remote(item)),
                        Err(remote) if remote.is_not_found() => {
                            Err(ResolveError::NotFoundAnywhere {
                                kind,
                                name: name.as_str().to_string(),
                                local,
                                remote,
                            })
                        }
                        Err(remote) => Err(ResolveError::Registry(remote)),
                    }
                }
            },
        };

        if let Ok(item) = &resolved {
            tracing::info!(%kind, name = name.as_str(), source = item.source(), "resolved");
        }
        resolved
    }
}

impl ResolveError {
    /// True for failures that mean "this name does not exist" under the
    /// configured mode, as opposed to infrastructure or credential
    /// faults. The validation path collapses these into one outward
    /// "unknown schema" kind.
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            Self::InvalidName(_)
                | Self::NotFoundLocal { .. }
                | Self::NotFoundRemote { .. }
                | Self::NotFoundAnywhere { .. }
                | Self::NotAMessage { .. }
        )
    }
}
