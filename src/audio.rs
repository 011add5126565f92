//! Audio playback subsystem.
//!
//! A dedicated thread owns the `rodio` output stream and a single `Sink`.
//! The rest of the app talks to it through [`AudioPlayer`], which implements
//! [`crate::player::AudioOutput`] by sending `AudioCmd`s, and reads back a
//! shared `PlaybackInfo` snapshot.

mod assets;
mod player;
mod sink;
mod thread;
mod types;

pub use assets::AssetStore;
pub use player::AudioPlayer;
pub use types::PlaybackHandle;
