//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the folder list, cursors
//! and status line. Playback state itself belongs to the player controller.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
