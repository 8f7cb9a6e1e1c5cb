//! Error types for the avalanche forecast skill

use thiserror::Error;

/// Failure while talking to the upstream forecast source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, TLS or body transfer failure
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Body was not the expected map-layer document
    #[error("Malformed forecast payload: {0}")]
    Malformed(String),
}

/// Failure reading or writing the persistent store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage engine itself failed
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A stored value could not be encoded or decoded
    #[error("Store codec error: {0}")]
    Codec(String),
}

/// Main error type for the avalanche forecast skill
#[derive(Error, Debug)]
pub enum AvalancheError {
    /// Upstream unreachable or malformed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Detail page could not be extracted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested region or state is absent from a valid snapshot
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence read/write failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No cached snapshot exists and the refresh failed
    #[error("No cached forecast and upstream failed: {0}")]
    Upstream(#[source] FetchError),

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AvalancheError {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the failure means no forecast data could be obtained at all
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}
