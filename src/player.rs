//! Playback control: the `PlayerController` state machine over
//! `PlaybackState`, independent of any rendering or audio backend.

mod controller;
mod events;
mod output;
mod state;
mod time;

pub use controller::{LoadOutcome, LoadTicket, PlayerController, TimeDisplay};
pub use events::PlayerEvent;
pub use output::AudioOutput;
pub use state::PlaybackState;
pub use time::{format_time, progress_fraction};
