/// The single audio playback primitive driven by `PlayerController`.
///
/// Calls are fire-and-forget; an implementation reports progress back
/// through its own channel (see `crate::audio::PlaybackInfo`).
pub trait AudioOutput {
    /// Drop whatever is loaded and prepare `source` paused at position zero.
    fn load(&mut self, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop and unload the current source.
    fn stop(&mut self);
    /// Move the playhead of the loaded source, in seconds.
    fn seek(&mut self, position: f64);
}
