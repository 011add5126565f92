use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::AudioError;
use crate::player::AudioOutput;

use super::assets::AssetStore;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Front end of the audio thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    settings: AudioSettings,
    /// Id of the most recent `Load` sent to the thread.
    loads: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(assets: AssetStore, audio_settings: AudioSettings) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(assets, rx, playback_info.clone())?;

        Ok(Self {
            tx,
            playback: playback_info,
            settings: audio_settings,
            loads: 0,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Id to match against `PlaybackInfo::take_progress`.
    pub fn current_load(&self) -> u64 {
        self.loads
    }

    fn send(&self, cmd: AudioCmd) {
        // The thread only goes away on quit; nothing useful to do after that.
        let _ = self.tx.send(cmd);
    }

    /// Fade out using the configured duration and wait for the thread to exit.
    pub fn quit_softly(&self) {
        self.quit_with_fade(Duration::from_millis(self.settings.quit_fade_out_ms));
    }

    pub fn quit_with_fade(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioOutput for AudioPlayer {
    fn load(&mut self, source: &str) {
        self.loads += 1;
        self.send(AudioCmd::Load {
            source: source.to_string(),
            load_id: self.loads,
        });
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, position: f64) {
        if position.is_finite() && position >= 0.0 {
            self.send(AudioCmd::Seek(Duration::from_secs_f64(position)));
        }
    }
}
