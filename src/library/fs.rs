use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::SourceError;

use super::listing::{parse_catalog, parse_metadata};
use super::model::FolderMetadata;
use super::source::ContentSource;

/// Serves folders from a local directory tree.
///
/// The catalog is `catalog_file` under the root when configured, otherwise
/// the root's visible subdirectories in name order.
pub struct DirSource {
    root: PathBuf,
    catalog_file: Option<String>,
    metadata_file: String,
}

impl DirSource {
    pub fn new(root: PathBuf, settings: &LibrarySettings) -> Self {
        Self {
            root,
            catalog_file: settings.catalog_file.clone(),
            metadata_file: settings.metadata_file.clone(),
        }
    }

    fn list_subdirectories(&self) -> Result<Vec<String>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound(self.root.display().to_string()));
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| SourceError::Io(e.into()))?;
            if !entry.file_type().is_dir() || is_hidden(entry.path()) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        Ok(ids)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

async fn read_resource(path: &Path) -> Result<String, SourceError> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(body),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SourceError::NotFound(path.display().to_string()))
        }
        Err(e) => Err(SourceError::Io(e)),
    }
}

#[async_trait]
impl ContentSource for DirSource {
    async fn fetch_catalog(&self) -> Result<Vec<String>, SourceError> {
        match self.catalog_file.as_deref() {
            Some(name) => {
                let path = self.root.join(name);
                debug!(path = %path.display(), "reading catalog file");
                let body = read_resource(&path).await?;
                parse_catalog(&path.display().to_string(), &body)
            }
            None => {
                debug!(root = %self.root.display(), "listing catalog directories");
                self.list_subdirectories()
            }
        }
    }

    async fn fetch_metadata(&self, folder_id: &str) -> Result<FolderMetadata, SourceError> {
        let path = self.root.join(folder_id).join(&self.metadata_file);
        let body = read_resource(&path).await?;
        parse_metadata(&path.display().to_string(), &body)
    }

    async fn asset_exists(&self, path: &str) -> Result<bool, SourceError> {
        match tokio::fs::metadata(self.root.join(path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}
