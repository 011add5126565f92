//! Opening track bytes from wherever the library lives.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use tracing::debug;

use crate::error::AudioError;
use crate::library::{SourceKind, display_name};

/// Resolves source paths (`{folder_id}/{filename}`) to readable audio.
#[derive(Debug)]
pub enum AssetStore {
    Dir(PathBuf),
    Http {
        base: String,
        /// Built on first use, inside the audio thread.
        client: Option<reqwest::blocking::Client>,
    },
}

impl AssetStore {
    pub fn from_kind(kind: &SourceKind) -> Self {
        match kind {
            SourceKind::Dir(root) => Self::Dir(root.clone()),
            SourceKind::Http(base) => Self::Http {
                base: base.clone(),
                client: None,
            },
        }
    }

    pub(super) fn open(&mut self, source: &str) -> Result<Asset, AudioError> {
        let open_err = |reason: String| AudioError::Open {
            source_path: source.to_string(),
            reason,
        };

        match self {
            Self::Dir(root) => {
                let path = local_path(root, source);
                debug!(path = %path.display(), "opening local track");
                let file = File::open(&path).map_err(|e| open_err(e.to_string()))?;
                Ok(Asset::File {
                    path,
                    reader: BufReader::new(file),
                })
            }
            Self::Http { base, client } => {
                let url = asset_url(base, source);
                debug!(%url, "fetching remote track");
                if client.is_none() {
                    let built = reqwest::blocking::Client::builder()
                        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                        .build()
                        .map_err(|e| open_err(e.to_string()))?;
                    *client = Some(built);
                }
                let Some(client) = client.as_ref() else {
                    return Err(open_err("http client unavailable".to_string()));
                };

                let resp = client.get(&url).send().map_err(|e| open_err(e.to_string()))?;
                if !resp.status().is_success() {
                    return Err(open_err(format!("HTTP {}", resp.status().as_u16())));
                }
                let bytes = resp.bytes().map_err(|e| open_err(e.to_string()))?;
                Ok(Asset::Memory(Cursor::new(bytes.to_vec())))
            }
        }
    }
}

/// URL of a track under an HTTP base. The source path is used verbatim since
/// catalog filenames are already URL-encoded.
pub(super) fn asset_url(base: &str, source: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        source.trim_start_matches('/')
    )
}

/// Local file for a source path. Percent-encoded filenames fall back to their
/// decoded form when the raw name does not exist on disk.
pub(super) fn local_path(root: &Path, source: &str) -> PathBuf {
    let raw = root.join(source);
    if raw.exists() {
        return raw;
    }
    match source.split_once('/') {
        Some((folder, file)) => {
            let decoded = root.join(folder).join(display_name(file));
            if decoded.exists() { decoded } else { raw }
        }
        None => raw,
    }
}

/// Opened track bytes, ready for the decoder.
#[derive(Debug)]
pub(super) enum Asset {
    File { path: PathBuf, reader: BufReader<File> },
    Memory(Cursor<Vec<u8>>),
}

impl Asset {
    /// Duration from container metadata, when lofty understands the format.
    pub(super) fn probe_duration(&mut self) -> Option<Duration> {
        let duration = match self {
            Self::File { path, .. } => lofty::read_from_path(path.as_path())
                .ok()
                .map(|tagged| tagged.properties().duration()),
            Self::Memory(cursor) => {
                let probed = Probe::new(Cursor::new(cursor.get_ref().as_slice()))
                    .guess_file_type()
                    .ok()?
                    .read()
                    .ok()?;
                Some(probed.properties().duration())
            }
        };
        duration.filter(|d| !d.is_zero())
    }
}

impl Read for Asset {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File { reader, .. } => reader.read(buf),
            Self::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl Seek for Asset {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File { reader, .. } => reader.seek(pos),
            Self::Memory(cursor) => cursor.seek(pos),
        }
    }
}
