//! Scripted engine mock for unit tests.
//!
//! Invocations are served in order from a queue. Each scripted invocation
//! controls the exit code, the diagnostic lines, and whether a file is
//! created at the output path (the last argument), standing in for the
//! engine writing its artifact.

use super::engine::{EngineProcess, EngineSpawner};
use super::probe::CodecProber;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::ExitStatus;
use std::rc::Rc;

/// One scripted engine invocation.
pub struct MockInvocation {
    pub exit_code: i32,
    pub stderr_lines: Vec<String>,
    pub create_output: bool,
}

impl MockInvocation {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            stderr_lines: Vec::new(),
            create_output: true,
        }
    }

    pub fn failure(exit_code: i32, stderr: &str) -> Self {
        Self {
            exit_code,
            stderr_lines: vec![stderr.to_string()],
            create_output: false,
        }
    }
}

pub struct MockEngineProcess {
    events: Vec<FfmpegEvent>,
    exit_status: ExitStatus,
}

impl EngineProcess for MockEngineProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Engine spawner that serves scripted invocations in order and records
/// every argument list it receives.
#[derive(Clone, Default)]
pub struct MockEngineSpawner {
    script: Rc<RefCell<VecDeque<MockInvocation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockEngineSpawner {
    pub fn new(script: Vec<MockInvocation>) -> Self {
        Self {
            script: Rc::new(RefCell::new(script.into())),
            received_calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

/// Scripted codec prober: answers every query with the configured codec,
/// or reports the artifact as having no audio stream.
pub struct MockCodecProber {
    codec: Option<String>,
}

impl MockCodecProber {
    pub fn with_codec(codec: &str) -> Self {
        Self { codec: Some(codec.to_string()) }
    }

    pub fn no_audio() -> Self {
        Self { codec: None }
    }
}

impl CodecProber for MockCodecProber {
    fn audio_codec(&self, input_path: &Path) -> CoreResult<String> {
        self.codec
            .clone()
            .ok_or_else(|| CoreError::NoAudioStream(input_path.display().to_string()))
    }
}

impl EngineSpawner for MockEngineSpawner {
    type Process = MockEngineProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let mut args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        // FfmpegCommand::new() injects "-loglevel level+info" before the
        // caller's arguments; drop it so recorded calls match the argument
        // list the operation passed to `invoke`.
        if args.first().map(String::as_str) == Some("-loglevel") {
            args.drain(..2);
        }
        self.received_calls.borrow_mut().push(args.clone());

        let invocation = self
            .script
            .borrow_mut()
            .pop_front()
            .expect("mock engine invoked more times than scripted");

        if invocation.create_output && invocation.exit_code == 0 {
            let output = args.last().expect("engine invoked with no arguments");
            std::fs::File::create(output)?;
        }

        let events = invocation
            .stderr_lines
            .into_iter()
            .map(|line| FfmpegEvent::Log(LogLevel::Error, line))
            .collect();

        Ok(MockEngineProcess {
            events,
            // Raw wait status encodes the exit code in the high byte.
            exit_status: ExitStatus::from_raw(invocation.exit_code << 8),
        })
    }
}
