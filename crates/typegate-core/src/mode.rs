//! Source resolution modes.

use std::fmt;
use std::str::FromStr;

/// Strategy for resolving a schema bundle or validation descriptor.
///
/// One mode is configured per resource kind (bundles and descriptors are
/// independently configurable) at startup and is read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Check the local source first, fall back to the remote registry on
    /// any local miss. The default.
    #[default]
    LocalThenRemote,
    /// Only consult the remote registry; local data is ignored even if
    /// present.
    RemoteOnly,
    /// Only consult the local source; the remote registry is never
    /// contacted.
    LocalOnly,
}

impl ResolutionMode {
    /// Parse a configuration string, falling back to the default for
    /// unrecognized values (matching the lenient startup behavior of the
    /// environment-driven configuration).
    pub fn from_config(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for ResolutionMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local-then-remote" => Ok(Self::LocalThenRemote),
            "remote-only" => Ok(Self::RemoteOnly),
            "local-only" => Ok(Self::LocalOnly),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LocalThenRemote => "local-then-remote",
            Self::RemoteOnly => "remote-only",
            Self::LocalOnly => "local-only",
        };
        f.write_str(s)
    }
}

/// An unrecognized resolution mode string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown resolution mode: {0}")]
pub struct UnknownMode(pub String);
