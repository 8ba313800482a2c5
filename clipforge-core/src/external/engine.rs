//! External engine gateway.
//!
//! Synchronous, blocking invocation of the transcoding engine with a fixed
//! argument list. A non-zero exit is not raised here; it comes back in
//! [`EngineOutput`] for the caller to translate into a domain error carrying
//! the diagnostic text verbatim.

use crate::error::{CoreResult, command_start_error, engine_failed_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// Result of one engine invocation.
#[derive(Debug)]
pub struct EngineOutput {
    pub status: ExitStatus,
    /// Diagnostic lines captured from the engine's log stream, joined with
    /// newlines, verbatim.
    pub stderr: String,
}

/// An active engine process.
pub trait EngineProcess {
    /// Drains events from the running command through the handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Something that can spawn an [`EngineProcess`] from a built command.
pub trait EngineSpawner {
    type Process: EngineProcess;

    /// Spawns the command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Wrapper around `ffmpeg_sidecar`'s child implementing [`EngineProcess`].
pub struct SidecarProcess(FfmpegChild);

impl EngineProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get engine event iterator: {e}");
            engine_failed_error(ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_start_error("ffmpeg (wait)", e))
    }
}

/// Production [`EngineSpawner`] backed by `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl EngineSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

/// Invokes the engine with `args` and collects its exit status and log
/// lines. This function never interprets the arguments.
pub fn invoke<S: EngineSpawner>(spawner: &S, args: &[String]) -> CoreResult<EngineOutput> {
    log::debug!("Invoking engine: ffmpeg {}", args.join(" "));

    let mut cmd = FfmpegCommand::new();
    cmd.args(args.iter().map(String::as_str));

    let mut process = spawner.spawn(cmd)?;
    let mut lines: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_, line) => lines.push(line),
            FfmpegEvent::Error(line) => lines.push(line),
            _ => {}
        }
        Ok(())
    })?;
    let status = process.wait()?;

    log::debug!("Engine exited with status {status}");
    Ok(EngineOutput {
        status,
        stderr: lines.join("\n"),
    })
}
