//! Interactions with the external engine binaries (ffmpeg, ffprobe).
//!
//! The engine gateway is a pure boundary: it runs an argument list and
//! surfaces the exit status plus captured diagnostic text, never inspecting
//! the arguments semantically. Spawning goes through a trait seam so tests
//! can inject a scripted engine.

use crate::error::{CoreError, CoreResult, command_start_error};
use std::io;
use std::process::{Command, Stdio};

pub mod engine;
pub mod probe;

#[cfg(test)]
pub mod mocks;

pub use engine::{EngineOutput, EngineProcess, EngineSpawner, SidecarSpawner, invoke};
pub use probe::{CodecProber, FfprobeProber, media_duration, probe_audio_codec, raw_metadata};

/// Checks that a required external command is available and executable by
/// running it with `-version`.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(command_start_error(cmd_name, e))
        }
    }
}
