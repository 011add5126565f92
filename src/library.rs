//! Library loading: content providers, the folder/track model and the
//! `LibraryLoader` that turns provider responses into folders and tracks.

mod display;
mod fs;
mod http;
mod listing;
mod loader;
mod model;
mod source;

pub use display::display_name;
pub use fs::DirSource;
pub use http::HttpSource;
pub use loader::LibraryLoader;
pub use model::*;
pub use source::{ContentSource, SourceKind};

#[cfg(test)]
mod tests;
