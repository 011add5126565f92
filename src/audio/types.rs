//! Commands and shared state for the audio thread.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug)]
pub enum AudioCmd {
    /// Prepare the track at `source`, paused at 0. `load_id` is echoed back
    /// in `PlaybackInfo` so stale snapshots can be told apart.
    Load { source: String, load_id: u64 },
    Play,
    Pause,
    /// Drop the current sink so nothing keeps sounding.
    Stop,
    /// Jump to an absolute position in the loaded track.
    Seek(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI loop.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Id of the `Load` this snapshot describes; 0 when nothing is loaded.
    pub load_id: u64,
    /// Source path of the loaded track, if any.
    pub source: Option<String>,
    pub position: Duration,
    /// Unknown until the track is decoded (or when the format does not say).
    pub duration: Option<Duration>,
    pub playing: bool,
    /// Set once the loaded track has played to its end.
    pub ended: bool,
    /// Last load/decode failure for `source`.
    pub error: Option<String>,
}

/// Progress for one load, taken out of a `PlaybackInfo` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Seconds.
    pub position: f64,
    /// Seconds; 0 while unknown.
    pub duration: f64,
    pub ended: bool,
    pub error: Option<String>,
}

impl PlaybackInfo {
    /// Progress of load `load_id`, consuming the one-shot `ended` and
    /// `error` flags. Snapshots of any other load are left untouched.
    pub fn take_progress(&mut self, load_id: u64) -> Option<Progress> {
        if load_id == 0 || self.load_id != load_id {
            return None;
        }
        Some(Progress {
            position: self.position.as_secs_f64(),
            duration: self.duration.map_or(0.0, |d| d.as_secs_f64()),
            ended: std::mem::take(&mut self.ended),
            error: self.error.take(),
        })
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
