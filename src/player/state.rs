use crate::library::{Folder, Track};

/// Everything the player knows about what is loaded and playing.
///
/// Invariant: `current_index < tracks.len()` whenever `tracks` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub folder: Option<Folder>,
    pub tracks: Vec<Track>,
    pub current_index: usize,
    pub is_playing: bool,
    /// Seconds.
    pub current_time: f64,
    /// Seconds; 0 while unknown.
    pub duration: f64,
}

impl PlaybackState {
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }
}
