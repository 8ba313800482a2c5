//! Artifact naming, resolution, and extension rules.
//!
//! An artifact is a named media file under the configured media root. Its
//! identity is its base name: any name containing a path separator is
//! rejected so an operation can never read or write outside the root.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Video container extensions accepted for video outputs.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"];

/// Audio container extensions accepted for audio outputs.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "flac", "m4a", "ogg"];

/// Image extensions accepted for image-sequence outputs.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// The category of artifact an operation produces, which constrains the
/// output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Video,
    Audio,
    ImageSequence,
}

impl MediaCategory {
    pub fn label(self) -> &'static str {
        match self {
            MediaCategory::Video => "video",
            MediaCategory::Audio => "audio",
            MediaCategory::ImageSequence => "image",
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaCategory::Video => VIDEO_EXTENSIONS,
            MediaCategory::Audio => AUDIO_EXTENSIONS,
            MediaCategory::ImageSequence => IMAGE_EXTENSIONS,
        }
    }
}

/// Checks that `name` is a plain base name that cannot escape the media root.
///
/// Rejects empty names, `.`/`..`, and anything containing `/` or `\`. The
/// check is purely lexical: it does not care whether a file exists at the
/// offending path.
pub fn ensure_safe_name(name: &str) -> CoreResult<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(CoreError::UnsafeName(name.to_string()));
    }
    Ok(())
}

/// Resolves a (previously safety-checked) artifact name under the media root.
pub fn resolve(config: &CoreConfig, name: &str) -> PathBuf {
    config.media_root.join(name)
}

/// Returns the lowercased extension of an artifact name, if any.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Checks that `name` carries an extension from `category`'s allow-list.
pub fn ensure_extension(name: &str, category: MediaCategory) -> CoreResult<()> {
    let allowed = category.extensions();
    match extension_of(name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(CoreError::InvalidExtension {
            name: name.to_string(),
            expected: category.label(),
            allowed: allowed.join(", "),
        }),
    }
}

/// True if `name` looks like a media artifact we list and operate on.
pub fn is_media_name(name: &str) -> bool {
    matches!(extension_of(name), Some(ext)
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) || AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_names() {
        assert!(ensure_safe_name("clip.mp4").is_ok());
        assert!(ensure_safe_name("My Clip (final).mkv").is_ok());
        assert!(ensure_safe_name("noext").is_ok());
    }

    #[test]
    fn test_separator_rejected_regardless_of_existence() {
        for name in ["../x.mp4", "a/b.mp4", "..\\x.mp4", "C:\\media\\x.mp4", "/etc/passwd"] {
            match ensure_safe_name(name) {
                Err(CoreError::UnsafeName(n)) => assert_eq!(n, name),
                other => panic!("expected UnsafeName for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_degenerate_names_rejected() {
        assert!(ensure_safe_name("").is_err());
        assert!(ensure_safe_name(".").is_err());
        assert!(ensure_safe_name("..").is_err());
    }

    #[test]
    fn test_ensure_extension() {
        assert!(ensure_extension("out.mp4", MediaCategory::Video).is_ok());
        assert!(ensure_extension("out.MKV", MediaCategory::Video).is_ok());
        assert!(ensure_extension("out.mp3", MediaCategory::Audio).is_ok());
        assert!(ensure_extension("frame_%04d.png", MediaCategory::ImageSequence).is_ok());

        assert!(ensure_extension("out.mp3", MediaCategory::Video).is_err());
        assert!(ensure_extension("out.mp4", MediaCategory::Audio).is_err());
        assert!(ensure_extension("out", MediaCategory::Video).is_err());
        match ensure_extension("out.txt", MediaCategory::Video) {
            Err(CoreError::InvalidExtension { expected, .. }) => assert_eq!(expected, "video"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_is_media_name() {
        assert!(is_media_name("a.mp4"));
        assert!(is_media_name("a.WAV"));
        assert!(!is_media_name("a.txt"));
        assert!(!is_media_name("a"));
    }
}
