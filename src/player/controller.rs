use tracing::{debug, info, warn};

use crate::error::LibraryError;
use crate::library::{Folder, LibraryLoader, Track};

use super::events::PlayerEvent;
use super::output::AudioOutput;
use super::state::PlaybackState;
use super::time::{format_time, progress_fraction};

/// Handle for one in-flight folder load.
///
/// Each `begin_load` issues a new generation; `finish_load` applies a result
/// only if its ticket carries the latest one.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    folder: Folder,
}

impl LoadTicket {
    pub fn folder(&self) -> &Folder {
        &self.folder
    }
}

/// What `finish_load` did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was requested after this one; the result was dropped.
    Stale,
}

/// Precomputed time strings and progress for the current track.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDisplay {
    pub elapsed: String,
    pub total: String,
    pub progress: f64,
}

impl Default for TimeDisplay {
    fn default() -> Self {
        Self {
            elapsed: format_time(0.0),
            total: format_time(0.0),
            progress: 0.0,
        }
    }
}

/// Owns `PlaybackState` and the audio primitive.
///
/// Transport calls on an empty track list, and out-of-range selections, are
/// no-ops rather than errors.
pub struct PlayerController<O: AudioOutput> {
    state: PlaybackState,
    output: O,
    generation: u64,
    pending: Option<String>,
    auto_advance: bool,
    /// The loaded track played to its end and was not restarted since.
    ended: bool,
    time: TimeDisplay,
    pending_events: Vec<PlayerEvent>,
}

impl<O: AudioOutput> PlayerController<O> {
    pub fn new(output: O) -> Self {
        Self {
            state: PlaybackState::default(),
            output,
            generation: 0,
            pending: None,
            auto_advance: true,
            ended: false,
            time: TimeDisplay::default(),
            pending_events: Vec::new(),
        }
    }

    /// Whether `on_track_ended` moves on to the next track.
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn time_display(&self) -> &TimeDisplay {
        &self.time
    }

    /// Folder id of the most recent load that has not completed yet.
    pub fn pending_folder(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Source path of the loaded track, as given to the audio primitive.
    pub fn current_source(&self) -> Option<String> {
        self.state.current_track().map(Track::source_path)
    }

    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Fetch `folder`'s tracks and apply them.
    ///
    /// Holding `&mut self` across the fetch serializes loads; callers that
    /// need concurrent switching use `begin_load`/`finish_load` directly.
    pub async fn load_folder(
        &mut self,
        loader: &LibraryLoader,
        folder: Folder,
    ) -> Result<(), LibraryError> {
        let ticket = self.begin_load(folder);
        let result = loader.list_tracks(ticket.folder()).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Register a load request for `folder`, superseding any earlier one.
    pub fn begin_load(&mut self, folder: Folder) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(folder.id.clone());
        debug!(folder = %folder.id, generation = self.generation, "folder load requested");
        LoadTicket {
            generation: self.generation,
            folder,
        }
    }

    /// Apply the result of a load started with `begin_load`.
    ///
    /// Results for superseded tickets are dropped, errors included. A failed
    /// current load leaves the previous state in place.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Track>, LibraryError>,
    ) -> Result<LoadOutcome, LibraryError> {
        if ticket.generation != self.generation {
            debug!(
                folder = %ticket.folder.id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale folder load"
            );
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;

        match result {
            Ok(tracks) => {
                self.apply_folder(ticket.folder, tracks);
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                warn!(folder = %ticket.folder.id, error = %e, "folder load failed");
                self.pending_events.push(PlayerEvent::FolderFailed {
                    folder_id: ticket.folder.id,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn apply_folder(&mut self, folder: Folder, tracks: Vec<Track>) {
        self.output.stop();

        info!(folder = %folder.id, tracks = tracks.len(), "folder loaded");
        let folder_id = folder.id.clone();
        let track_count = tracks.len();

        self.state.folder = Some(folder);
        self.state.tracks = tracks;
        self.state.current_index = 0;
        self.state.is_playing = false;
        self.ended = false;
        self.reset_time();

        // First track is loaded but stays paused.
        if let Some(source) = self.current_source() {
            self.output.load(&source);
        }

        self.pending_events.push(PlayerEvent::FolderLoaded {
            folder_id,
            track_count,
        });
    }

    /// Play the track at `index` from the start. Returns `false` (and changes
    /// nothing) when `index` is out of range.
    pub fn select_track(&mut self, index: usize) -> bool {
        if index >= self.state.tracks.len() {
            debug!(index, len = self.state.tracks.len(), "ignoring out-of-range selection");
            return false;
        }
        self.start_track(index);
        true
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.state.has_tracks() {
            return;
        }
        if !self.state.is_playing && self.ended {
            // A finished track has nothing left to resume; play it again.
            self.start_track(self.state.current_index);
            return;
        }
        if self.state.is_playing {
            self.output.pause();
        } else {
            self.output.play();
        }
        self.state.is_playing = !self.state.is_playing;
        self.pending_events.push(PlayerEvent::PlayingChanged {
            playing: self.state.is_playing,
        });
    }

    pub fn next(&mut self) {
        let len = self.state.tracks.len();
        if len == 0 {
            return;
        }
        self.start_track((self.state.current_index + 1) % len);
    }

    pub fn previous(&mut self) {
        let len = self.state.tracks.len();
        if len == 0 {
            return;
        }
        self.start_track((self.state.current_index + len - 1) % len);
    }

    /// Jump to `fraction` of the current track's duration.
    ///
    /// No-op unless `fraction` is within `[0, 1]` and the duration is known.
    pub fn seek(&mut self, fraction: f64) -> bool {
        let duration = self.state.duration;
        if !self.state.has_tracks()
            || !(0.0..=1.0).contains(&fraction)
            || !(duration.is_finite() && duration > 0.0)
        {
            return false;
        }

        let position = fraction * duration;
        self.state.current_time = position;
        self.ended = false;
        self.output.seek(position);
        self.refresh_time();
        self.pending_events.push(PlayerEvent::Seeked { position });
        true
    }

    /// Seek relative to the current position by `delta` seconds, clamped to
    /// the track bounds.
    pub fn scrub(&mut self, delta: f64) -> bool {
        let duration = self.state.duration;
        if !(duration.is_finite() && duration > 0.0) {
            return false;
        }
        let target = (self.state.current_time + delta).clamp(0.0, duration);
        self.seek(target / duration)
    }

    /// Progress tick from the audio primitive.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) {
        self.state.current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };
        self.state.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.refresh_time();
    }

    /// The loaded track played to its end.
    pub fn on_track_ended(&mut self) {
        if !self.state.has_tracks() {
            return;
        }
        if self.auto_advance {
            self.next();
        } else {
            self.state.is_playing = false;
            self.ended = true;
            self.pending_events
                .push(PlayerEvent::PlayingChanged { playing: false });
        }
    }

    fn start_track(&mut self, index: usize) {
        // Never let two tracks overlap: stop before loading the next one.
        self.output.stop();
        self.state.current_index = index;
        self.ended = false;

        if let Some(source) = self.current_source() {
            self.output.load(&source);
            self.output.play();
        }
        self.state.is_playing = true;
        self.reset_time();

        debug!(index, "track started");
        self.pending_events.push(PlayerEvent::TrackStarted { index });
    }

    fn reset_time(&mut self) {
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.refresh_time();
    }

    fn refresh_time(&mut self) {
        self.time = TimeDisplay {
            elapsed: format_time(self.state.current_time),
            total: format_time(self.state.duration),
            progress: progress_fraction(self.state.current_time, self.state.duration),
        };
    }
}
