//! FFprobe integration for stream and format metadata.
//!
//! Read-only queries against the probing engine. Probe failures come back as
//! [`CoreError::ProbeFailed`] rather than a transport-level fault, so
//! callers can decide how to surface them.

use crate::error::{CoreError, CoreResult};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Something that can answer codec queries about an artifact. Operations
/// that gate on the compatibility oracle take this seam so tests can
/// inject a scripted codec.
pub trait CodecProber {
    /// Codec identifier of the first audio stream, `NoAudioStream` if the
    /// artifact has none.
    fn audio_codec(&self, input_path: &Path) -> CoreResult<String>;
}

/// Production [`CodecProber`] backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct FfprobeProber;

impl CodecProber for FfprobeProber {
    fn audio_codec(&self, input_path: &Path) -> CoreResult<String> {
        probe_audio_codec(input_path)
    }
}

/// Returns the codec identifier of the first audio stream in the artifact,
/// `NoAudioStream` if the artifact has no audio, or `ProbeFailed` if the
/// probe invocation itself errors.
pub fn probe_audio_codec(input_path: &Path) -> CoreResult<String> {
    log::debug!("Probing audio codec: {}", input_path.display());
    let metadata = ffprobe(input_path).map_err(|err| map_ffprobe_error(err, "audio codec"))?;

    metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .and_then(|s| s.codec_name.clone())
        .ok_or_else(|| CoreError::NoAudioStream(input_path.display().to_string()))
}

/// Returns the container duration in seconds.
pub fn media_duration(input_path: &Path) -> CoreResult<f64> {
    log::debug!("Probing duration: {}", input_path.display());
    let metadata = ffprobe(input_path).map_err(|err| map_ffprobe_error(err, "duration"))?;

    metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| {
            CoreError::ProbeFailed(format!(
                "no parseable duration in format metadata for {}",
                input_path.display()
            ))
        })
}

/// Raw stream/format metadata passthrough as a JSON value, for the
/// metadata query surface.
pub fn raw_metadata(input_path: &Path) -> CoreResult<serde_json::Value> {
    log::debug!("Probing metadata: {}", input_path.display());
    let metadata = ffprobe(input_path).map_err(|err| map_ffprobe_error(err, "metadata"))?;
    serde_json::to_value(&metadata)
        .map_err(|e| CoreError::ProbeFailed(format!("metadata serialization: {e}")))
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => {
            CoreError::ProbeFailed(format!("ffprobe ({context}) failed to start: {io_err}"))
        }
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            CoreError::ProbeFailed(format!(
                "ffprobe ({context}) exited with {}: {stderr}",
                output.status
            ))
        }
        FfProbeError::Deserialize(err) => {
            CoreError::ProbeFailed(format!("ffprobe ({context}) output deserialization: {err}"))
        }
        _ => CoreError::ProbeFailed(format!("unknown ffprobe error during {context}: {err:?}")),
    }
}
