use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::error::AudioError;

use super::assets::AssetStore;
use super::sink::create_sink;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// The track currently held by the audio thread.
struct Loaded {
    source: String,
    sink: Sink,
    duration: Option<Duration>,
    /// Added to `Sink::get_pos` after a seek that rebuilt the sink.
    offset: Duration,
    paused: bool,
}

impl Loaded {
    fn position(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }
}

/// Spawn the audio thread and wait until the output device is open.
pub(super) fn spawn_audio_thread(
    mut assets: AssetStore,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
) -> Result<JoinHandle<()>, AudioError> {
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);

    let handle = thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                let _ = ready_tx.send(Ok(()));
                stream
            }
            Err(e) => {
                let _ = ready_tx.send(Err(AudioError::Device(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut loaded: Option<Loaded> = None;

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { source, load_id } => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        loaded = do_load(&stream, &mut assets, &source, load_id, &playback_info);
                    }

                    AudioCmd::Play => {
                        if let Some(l) = loaded.as_mut() {
                            l.sink.play();
                            l.paused = false;
                            update(&playback_info, |info| {
                                info.playing = true;
                                info.ended = false;
                            });
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(l) = loaded.as_mut() {
                            l.sink.pause();
                            l.paused = true;
                            let position = l.position();
                            update(&playback_info, |info| {
                                info.playing = false;
                                info.position = position;
                            });
                        }
                    }

                    AudioCmd::Stop => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        update(&playback_info, |info| *info = PlaybackInfo::default());
                    }

                    AudioCmd::Seek(target) => {
                        let Some(l) = loaded.as_mut() else {
                            continue;
                        };
                        do_seek(&stream, &mut assets, l, target);
                        let position = l.position();
                        update(&playback_info, |info| {
                            info.position = position;
                            info.ended = false;
                        });
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(l) = loaded.as_ref() {
                            if !l.paused {
                                // Fade out gently before stopping.
                                fade_out_sink(&l.sink, fade_out_ms);
                            }
                            l.sink.stop();
                        }
                        update(&playback_info, |info| info.playing = false);
                        info!("audio thread exiting");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(l) = loaded.as_mut() else {
                        continue;
                    };
                    if l.paused {
                        continue;
                    }
                    let position = l.position();
                    let finished = l.sink.empty();
                    if finished {
                        debug!(source = %l.source, "track ended");
                        l.paused = true;
                    }
                    update(&playback_info, |info| {
                        info.position = l.duration.map_or(position, |d| position.min(d));
                        if finished {
                            info.playing = false;
                            info.ended = true;
                        }
                    });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => Err(AudioError::Device("audio thread exited during startup".to_string())),
    }
}

fn update(playback_info: &PlaybackHandle, f: impl FnOnce(&mut PlaybackInfo)) {
    if let Ok(mut info) = playback_info.lock() {
        f(&mut info);
    }
}

fn do_load(
    stream: &OutputStream,
    assets: &mut AssetStore,
    source: &str,
    load_id: u64,
    playback_info: &PlaybackHandle,
) -> Option<Loaded> {
    let prepared = assets
        .open(source)
        .and_then(|asset| create_sink(stream, asset, source, Duration::ZERO));

    match prepared {
        Ok((sink, duration)) => {
            debug!(%source, ?duration, "track loaded");
            update(playback_info, |info| {
                *info = PlaybackInfo {
                    load_id,
                    source: Some(source.to_string()),
                    duration,
                    ..PlaybackInfo::default()
                };
            });
            Some(Loaded {
                source: source.to_string(),
                sink,
                duration,
                offset: Duration::ZERO,
                paused: true,
            })
        }
        Err(e) => {
            warn!(%source, error = %e, "failed to load track");
            update(playback_info, |info| {
                *info = PlaybackInfo {
                    load_id,
                    source: Some(source.to_string()),
                    error: Some(e.to_string()),
                    ..PlaybackInfo::default()
                };
            });
            None
        }
    }
}

/// Seek in place when the decoder supports it, otherwise rebuild the sink and
/// skip into the file.
fn do_seek(stream: &OutputStream, assets: &mut AssetStore, l: &mut Loaded, target: Duration) {
    let target = l.duration.map_or(target, |d| target.min(d));

    // A finished sink has no source left to seek in.
    if !l.sink.empty() {
        match l.sink.try_seek(target) {
            Ok(()) => {
                l.offset = Duration::ZERO;
                return;
            }
            Err(e) => debug!(source = %l.source, error = %e, "in-place seek failed; rebuilding sink"),
        }
    }

    let rebuilt = assets
        .open(&l.source)
        .and_then(|asset| create_sink(stream, asset, &l.source, target));
    match rebuilt {
        Ok((sink, _)) => {
            l.sink.stop();
            if !l.paused {
                sink.play();
            }
            l.sink = sink;
            l.offset = target;
        }
        Err(e) => warn!(source = %l.source, error = %e, "seek failed"),
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
