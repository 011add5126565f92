use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::LibrarySettings;
use crate::error::SourceError;

use super::model::FolderMetadata;

/// A content provider serving the catalog and per-folder metadata.
///
/// Implementations only fetch and parse; skip/fail policy lives in
/// `LibraryLoader`.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Folder identifiers in catalog order.
    async fn fetch_catalog(&self) -> Result<Vec<String>, SourceError>;

    async fn fetch_metadata(&self, folder_id: &str) -> Result<FolderMetadata, SourceError>;

    /// Whether an asset such as a cover (`{folder_id}/{file}`) is present.
    async fn asset_exists(&self, path: &str) -> Result<bool, SourceError>;
}

/// Where folders come from: a local directory tree or an HTTP static host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Dir(PathBuf),
    Http(String),
}

impl SourceKind {
    /// Interpret a user-supplied location: http(s) URLs are hosts, anything
    /// else is a directory.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http(location.trim_end_matches('/').to_string())
        } else {
            Self::Dir(PathBuf::from(location))
        }
    }

    pub fn from_settings(settings: &LibrarySettings) -> Self {
        match settings.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Self::Http(url.trim_end_matches('/').to_string()),
            None => Self::Dir(settings.root.clone()),
        }
    }

    /// Build the provider for this location.
    pub fn connect(&self, settings: &LibrarySettings) -> Result<Box<dyn ContentSource>, SourceError> {
        Ok(match self {
            Self::Dir(root) => Box::new(super::DirSource::new(root.clone(), settings)),
            Self::Http(base) => Box::new(super::HttpSource::new(base.clone(), settings)?),
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Dir(root) => root.display().to_string(),
            Self::Http(base) => base.clone(),
        }
    }
}
