//! Application view model: `App` and `Pane`.

use crate::library::Folder;
use crate::player::PlayerEvent;

/// Which list receives cursor keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Library,
    Tracks,
}

/// The main application model.
pub struct App {
    pub folders: Vec<Folder>,
    pub focus: Pane,
    pub library_cursor: usize,
    pub track_cursor: usize,
    pub show_library: bool,
    /// One-line message shown under the now-playing bar.
    pub status: Option<String>,
    /// Where the library comes from, for the header.
    pub source_label: String,
}

impl App {
    pub fn new(source_label: impl Into<String>, show_library: bool) -> Self {
        Self {
            folders: Vec::new(),
            focus: if show_library {
                Pane::Library
            } else {
                Pane::Tracks
            },
            library_cursor: 0,
            track_cursor: 0,
            show_library,
            status: None,
            source_label: source_label.into(),
        }
    }

    /// Replace the folder list, keeping the cursor in range.
    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders;
        if self.library_cursor >= self.folders.len() {
            self.library_cursor = self.folders.len().saturating_sub(1);
        }
    }

    /// Point the library cursor at `folder_id`, if it is listed.
    pub fn focus_folder(&mut self, folder_id: &str) {
        if let Some(i) = self.folders.iter().position(|f| f.id == folder_id) {
            self.library_cursor = i;
        }
    }

    /// Folder under the library cursor.
    pub fn highlighted_folder(&self) -> Option<&Folder> {
        self.folders.get(self.library_cursor)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_library = !self.show_library;
        if !self.show_library {
            self.focus = Pane::Tracks;
        }
    }

    /// Swap focus between panes; the library pane only when it is visible.
    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Pane::Library => Pane::Tracks,
            Pane::Tracks if self.show_library => Pane::Library,
            Pane::Tracks => Pane::Tracks,
        };
    }

    /// Move the focused cursor down, wrapping. `track_count` is the length of
    /// the loaded track list.
    pub fn next(&mut self, track_count: usize) {
        match self.focus {
            Pane::Library => self.library_cursor = wrap_next(self.library_cursor, self.folders.len()),
            Pane::Tracks => self.track_cursor = wrap_next(self.track_cursor, track_count),
        }
    }

    /// Move the focused cursor up, wrapping.
    pub fn prev(&mut self, track_count: usize) {
        match self.focus {
            Pane::Library => self.library_cursor = wrap_prev(self.library_cursor, self.folders.len()),
            Pane::Tracks => self.track_cursor = wrap_prev(self.track_cursor, track_count),
        }
    }

    /// Jump the focused cursor to the first entry.
    pub fn jump_top(&mut self) {
        match self.focus {
            Pane::Library => self.library_cursor = 0,
            Pane::Tracks => self.track_cursor = 0,
        }
    }

    /// Jump the focused cursor to the last entry.
    pub fn jump_bottom(&mut self, track_count: usize) {
        match self.focus {
            Pane::Library => self.library_cursor = self.folders.len().saturating_sub(1),
            Pane::Tracks => self.track_cursor = track_count.saturating_sub(1),
        }
    }

    /// Reflect a controller notification in the view.
    pub fn apply_event(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::FolderLoaded {
                folder_id,
                track_count,
            } => {
                self.track_cursor = 0;
                self.focus_folder(folder_id);
                let title = self
                    .folders
                    .iter()
                    .find(|f| &f.id == folder_id)
                    .map_or(folder_id.as_str(), |f| f.title.as_str());
                self.status = Some(match track_count {
                    0 => format!("{title}: no tracks"),
                    1 => format!("{title}: 1 track"),
                    n => format!("{title}: {n} tracks"),
                });
            }
            PlayerEvent::FolderFailed { folder_id, message } => {
                self.status = Some(format!("could not load {folder_id}: {message}"));
            }
            PlayerEvent::TrackStarted { index } => {
                self.track_cursor = *index;
            }
            PlayerEvent::PlayingChanged { .. } | PlayerEvent::Seeked { .. } => {}
        }
    }
}

fn wrap_next(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + 1) % len }
}

fn wrap_prev(current: usize, len: usize) -> usize {
    match (current, len) {
        (_, 0) => 0,
        (0, len) => len - 1,
        (c, len) => c.min(len) - 1,
    }
}
