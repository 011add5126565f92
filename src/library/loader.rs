use tracing::{debug, info, warn};

use crate::error::LibraryError;

use super::model::{Folder, Track};
use super::source::ContentSource;

/// Resolves folders and their tracks from a content provider.
///
/// Both operations are plain reads; applying their results to playback
/// state is up to the caller.
pub struct LibraryLoader {
    source: Box<dyn ContentSource>,
}

impl LibraryLoader {
    pub fn new(source: Box<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Fetch the catalog, then each folder's metadata in catalog order.
    ///
    /// Folders whose metadata cannot be fetched or parsed, or whose cover is
    /// missing, are skipped; only a failure of the catalog itself fails the
    /// call.
    pub async fn list_folders(&self) -> Result<Vec<Folder>, LibraryError> {
        let ids = self
            .source
            .fetch_catalog()
            .await
            .map_err(LibraryError::CatalogUnavailable)?;

        let mut folders = Vec::with_capacity(ids.len());
        for id in &ids {
            let meta = match self.source.fetch_metadata(id).await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(folder = %id, error = %e, "skipping folder");
                    continue;
                }
            };

            let folder = Folder::from_metadata(id, &meta);
            match self.source.asset_exists(&folder.cover_path()).await {
                Ok(true) => folders.push(folder),
                Ok(false) => warn!(folder = %id, cover = %folder.cover, "skipping folder without cover"),
                Err(e) => warn!(folder = %id, error = %e, "skipping folder; cover check failed"),
            }
        }

        info!(
            listed = ids.len(),
            loaded = folders.len(),
            "catalog loaded"
        );
        Ok(folders)
    }

    /// Fetch the ordered track list for `folder`. Zero tracks is not an error.
    pub async fn list_tracks(&self, folder: &Folder) -> Result<Vec<Track>, LibraryError> {
        let meta = self
            .source
            .fetch_metadata(&folder.id)
            .await
            .map_err(|source| LibraryError::FolderUnavailable {
                folder: folder.id.clone(),
                source,
            })?;

        debug!(folder = %folder.id, tracks = meta.tracks.len(), "tracks listed");
        Ok(meta
            .tracks
            .into_iter()
            .map(|filename| Track::new(folder.id.clone(), filename))
            .collect())
    }
}
