use serde::Deserialize;

/// A named collection of tracks with display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Cover reference, relative to the folder.
    pub cover: String,
}

impl Folder {
    pub fn from_metadata(id: &str, meta: &FolderMetadata) -> Self {
        Self {
            id: id.to_string(),
            title: meta.title.clone(),
            description: meta.description.clone(),
            cover: meta.cover.clone(),
        }
    }

    /// Path of the cover asset as seen by the content provider.
    pub fn cover_path(&self) -> String {
        format!("{}/{}", self.id, self.cover)
    }
}

/// A single playable item inside a folder.
///
/// `filename` is kept exactly as the metadata lists it; decoding for display
/// happens in [`super::display_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub folder_id: String,
    pub filename: String,
}

impl Track {
    pub fn new(folder_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            folder_id: folder_id.into(),
            filename: filename.into(),
        }
    }

    /// Source path handed to the audio primitive: `{folder_id}/{filename}`.
    pub fn source_path(&self) -> String {
        format!("{}/{}", self.folder_id, self.filename)
    }

    pub fn display(&self) -> String {
        super::display_name(&self.filename)
    }
}

/// Per-folder metadata document (`info.json`). Every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderMetadata {
    pub title: String,
    pub description: String,
    pub cover: String,
    pub tracks: Vec<String>,
}
