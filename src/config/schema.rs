use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/albumdeck/config.toml` or `~/.config/albumdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALBUMDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding one subdirectory per folder. Used when `url` is unset.
    pub root: PathBuf,
    /// Base URL of an HTTP host serving the same layout (e.g. `http://localhost:8000/songs`).
    pub url: Option<String>,
    /// Folder loaded at startup; the first catalog entry when unset or unknown.
    pub default_folder: Option<String>,
    /// Catalog document relative to the root (JSON array or HTML listing).
    /// When unset, directories are listed instead.
    pub catalog_file: Option<String>,
    /// Per-folder metadata document name.
    pub metadata_file: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("songs"),
            url: None,
            default_folder: None,
            catalog_file: None,
            metadata_file: "info.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the library sidebar starts visible.
    pub show_library: bool,
    /// Separator between elapsed and total time.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ pick an album, press play ~ ".to_string(),
            show_library: true,
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the next track (wrapping) when the current one ends.
    pub auto_advance: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { auto_advance: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enabled: bool,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/albumdeck/albumdeck.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}
