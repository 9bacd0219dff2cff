//! Registry client error types.

/// Errors from remote registry calls.
///
/// Each outward failure mode is distinct so callers can map them to
/// transport-appropriate responses. There is no retry logic here — a
/// failed call is reported upward immediately.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry rejected the credential (HTTP 401). Also the outcome
    /// of anonymous access to a private resource.
    #[error("unauthorized: registry credential missing or invalid")]
    Unauthorized,
    /// The requested resource does not exist in the registry (HTTP 404).
    #[error("not found in registry: {what}")]
    NotFound { what: String },
    /// The registry returned an unexpected non-2xx status.
    #[error("registry {endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Network-level failure: DNS, connection, timeout.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The registry answered 2xx but the body could not be decoded.
    #[error("failed to decode registry response from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },
}

impl RegistryError {
    /// True when the failure means "the name does not exist remotely",
    /// as opposed to a harder infrastructure or credential fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
