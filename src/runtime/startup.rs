use tracing::warn;

use crate::library::Folder;

/// Folder to load at startup: the requested one when it is listed, else the
/// first catalog entry.
pub fn pick_default_folder<'a>(folders: &'a [Folder], wanted: Option<&str>) -> Option<&'a Folder> {
    if let Some(id) = wanted {
        match folders.iter().find(|f| f.id == id) {
            Some(folder) => return Some(folder),
            None => warn!(folder = %id, "default folder not in catalog; using first entry"),
        }
    }
    folders.first()
}
