//! Error types shared by the library loader, the content providers and the
//! audio thread.

use thiserror::Error;

/// Failures reported by a content provider for a single resource.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The resource does not exist (missing file, HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The resource exists but could not be parsed.
    #[error("malformed {resource}: {reason}")]
    Malformed { resource: String, reason: String },

    /// The provider answered with an unexpected HTTP status.
    #[error("unexpected status {status} for {resource}")]
    Status { status: u16, resource: String },

    /// HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    pub fn malformed(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced by `LibraryLoader` to its callers.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The catalog itself could not be fetched or parsed.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[source] SourceError),

    /// A specific folder's metadata is missing or malformed.
    #[error("folder `{folder}` unavailable: {source}")]
    FolderUnavailable {
        folder: String,
        #[source]
        source: SourceError,
    },
}

/// Errors raised while opening the output device or preparing a track.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Device(String),

    #[error("failed to open {source_path}: {reason}")]
    Open { source_path: String, reason: String },

    #[error("failed to decode {source_path}: {reason}")]
    Decode { source_path: String, reason: String },
}
