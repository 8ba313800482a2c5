//! Container/audio-codec compatibility matrix.
//!
//! Consulted before any operation that stream-copies an existing audio
//! track into a new container (merge, replace_audio). Copying an
//! incompatible codec produces a file many players cannot open, so the
//! check fails fast before the engine is ever invoked. Containers not
//! listed in the matrix accept any codec.

use crate::error::{CoreError, CoreResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static CONTAINER_AUDIO_CODECS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("mp4", &["aac", "mp3", "ac3", "eac3"]);
        m.insert("mov", &["aac", "mp3", "ac3", "pcm_s16le", "pcm_s24le"]);
        m.insert("webm", &["opus", "vorbis"]);
        m.insert("avi", &["mp3", "ac3", "pcm_s16le"]);
        // mkv is deliberately absent: it accepts effectively anything.
        m
    });

/// Checks whether `codec` may be stream-copied into a container with the
/// given extension. Extensions not governed by the matrix always pass.
pub fn check_compatibility(container_ext: &str, codec: &str) -> CoreResult<()> {
    let ext = container_ext.trim_start_matches('.').to_ascii_lowercase();
    match CONTAINER_AUDIO_CODECS.get(ext.as_str()) {
        Some(allowed) if !allowed.contains(&codec) => Err(CoreError::CodecIncompatible {
            container: ext,
            codec: codec.to_string(),
        }),
        _ => Ok(()),
    }
}
