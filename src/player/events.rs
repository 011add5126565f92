//! State-change notifications queued by `PlayerController` for the UI.

/// Events emitted by the controller, drained with
/// [`super::PlayerController::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// A folder's track list replaced the previous one.
    FolderLoaded { folder_id: String, track_count: usize },

    /// Loading a folder failed; the previous state is untouched.
    FolderFailed { folder_id: String, message: String },

    /// A track started from the beginning.
    TrackStarted { index: usize },

    /// Play/pause was toggled.
    PlayingChanged { playing: bool },

    /// The playhead was moved by a seek.
    Seeked { position: f64 },
}
