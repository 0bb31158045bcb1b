//! Repository client error types.

/// Errors from repository API calls.
///
/// A 404 on a read is not an error: read operations return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// HTTP transport error (connection failure, timeout).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Host returned a non-2xx status.
    #[error("repository API {endpoint} returned {status}: {body}")]
    Remote {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Host rejected a write because the supplied content hash is stale or
    /// missing (someone else committed in between).
    #[error("repository API {endpoint} rejected a stale content hash ({status}): {body}")]
    Conflict {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Looking up the current content hash before a write failed for a
    /// reason other than the file being absent.
    #[error("could not determine current content hash of {path}: {source}")]
    ContentHashLookup {
        path: String,
        #[source]
        source: Box<RepoError>,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Request URL could not be built from the configured API base.
    #[error("cannot build request URL from {0}")]
    InvalidBaseUrl(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl RepoError {
    /// HTTP status carried by this error, if the host answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } | Self::Conflict { status, .. } => Some(*status),
            Self::ContentHashLookup { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the host rejected the call because of a stale content hash.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
