use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_path};

/// Where log lines go. The TUI owns the terminal, so it logs to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns the log file path when logging to
/// a file.
pub fn init(settings: &LoggingSettings, target: LogTarget) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(filter(settings))
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            None
        }
        LogTarget::File => {
            let path = settings.file.clone().or_else(default_log_path)?;
            if let Some(parent) = path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    eprintln!("albumdeck: cannot create log directory {}: {e}", parent.display());
                    return None;
                }
            }
            let file = match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("albumdeck: cannot open log file {}: {e}", path.display());
                    return None;
                }
            };

            let _ = tracing_subscriber::registry()
                .with(filter(settings))
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init();
            Some(path)
        }
    }
}
