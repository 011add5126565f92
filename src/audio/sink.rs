//! Creating `rodio` sinks from opened assets.

use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::AudioError;

use super::assets::Asset;

/// Decode `asset` into a paused `Sink` starting at `start_at`.
///
/// Returns the sink together with the track duration, if it can be known.
pub(super) fn create_sink(
    stream: &OutputStream,
    mut asset: Asset,
    source_path: &str,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), AudioError> {
    let probed = asset.probe_duration();

    let decoder = Decoder::new(asset).map_err(|e| AudioError::Decode {
        source_path: source_path.to_string(),
        reason: e.to_string(),
    })?;
    let duration = probed.or_else(|| decoder.total_duration());

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is the fallback seeking primitive; Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();
    Ok((sink, duration))
}
