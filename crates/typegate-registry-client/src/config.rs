//! Registry client configuration.
//!
//! Connection coordinates for the remote schema registry. The module
//! coordinates (owner/module) can come from a `registry.yaml` manifest at
//! the repository root, mirroring how the registry's own tooling names
//! modules; parse failure falls back to compiled defaults at the caller.

use std::path::Path;

use url::Url;

/// Configuration for the remote schema registry.
///
/// Custom `Debug` implementation redacts the token to prevent credential
/// leakage in log output.
#[derive(Clone)]
pub struct RegistryConfig {
    /// Base URL of the registry, e.g. `https://registry.typegate.dev`.
    pub base_url: Url,
    /// Module owner (organization) in the registry.
    pub owner: String,
    /// Module name in the registry.
    pub module: String,
    /// Label used when a call does not name a version. Defaults to `main`.
    pub default_label: String,
    /// Bearer token. Absent means anonymous access — the registry may
    /// still reject private resources with 401.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("base_url", &self.base_url)
            .field("owner", &self.owner)
            .field("module", &self.module)
            .field("default_label", &self.default_label)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RegistryConfig {
    /// Full module reference, `host/owner/module`.
    pub fn module_ref(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("registry");
        format!("{}/{}/{}", host, self.owner, self.module)
    }
}

/// Module coordinates parsed from a `registry.yaml` manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCoordinates {
    pub owner: String,
    pub module: String,
}

impl ModuleCoordinates {
    /// Parse the manifest at `path`.
    ///
    /// The manifest names the module as `module: <host>/<owner>/<module>`
    /// (a `name:` key is accepted as well, matching older manifests).
    pub fn from_manifest(path: &Path) -> Result<Self, ManifestError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ManifestError::Unreadable {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        let doc: serde_yaml::Value =
            serde_yaml::from_str(&raw).map_err(|e| ManifestError::Malformed {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;

        let reference = doc
            .get("module")
            .or_else(|| doc.get("name"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| ManifestError::MissingModule {
                path: path.display().to_string(),
            })?;

        Self::parse_reference(reference).ok_or_else(|| ManifestError::BadReference {
            path: path.display().to_string(),
            reference: reference.to_string(),
        })
    }

    /// Split a `<host>/<owner>/<module>` reference into coordinates.
    fn parse_reference(reference: &str) -> Option<Self> {
        let mut parts = reference.trim().split('/');
        let _host = parts.next().filter(|s| !s.is_empty())?;
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let module = parts.next().filter(|s| !s.is_empty())?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            module: module.to_string(),
        })
    }
}

/// A manifest that could not supply module coordinates.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {detail}")]
    Unreadable { path: String, detail: String },
    #[error("manifest {path} is not valid YAML: {detail}")]
    Malformed { path: String, detail: String },
    #[error("manifest {path} names no module")]
    MissingModule { path: String },
    #[error("manifest {path} has malformed module reference '{reference}'")]
    BadReference { path: String, reference: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_reference() {
        let coords = ModuleCoordinates::parse_reference("registry.typegate.dev/acme/types").unwrap();
        assert_eq!(coords.owner, "acme");
        assert_eq!(coords.module, "types");
    }

    #[test]
    fn rejects_malformed_references() {
        for bad in ["", "acme", "host/acme", "host/acme/types/extra", "host//types"] {
            assert!(
                ModuleCoordinates::parse_reference(bad).is_none(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn debug_redacts_token() {
        let config = RegistryConfig {
            base_url: "https://registry.typegate.dev".parse().unwrap(),
            owner: "acme".into(),
            module: "types".into(),
            default_label: "main".into(),
            token: Some("super-secret".into()),
            timeout_secs: 30,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn module_ref_includes_host() {
        let config = RegistryConfig {
            base_url: "https://registry.typegate.dev".parse().unwrap(),
            owner: "acme".into(),
            module: "types".into(),
            default_label: "main".into(),
            token: None,
            timeout_secs: 30,
        };
        assert_eq!(config.module_ref(), "registry.typegate.dev/acme/types");
    }
}
