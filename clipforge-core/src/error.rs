//! Error types for clipforge-core.
//!
//! Every failure a caller can observe is a variant of [`CoreError`]. All
//! validation variants are produced before any external process is started;
//! [`CoreError::EngineFailed`] carries the engine's diagnostic text verbatim
//! so operators can see the underlying complaint.

use std::io;
use thiserror::Error;

/// Custom error types for clipforge
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // ---- Validation failures (always detected before any invocation) ----
    #[error("file name '{0}' must not contain directory separators")]
    UnsafeName(String),

    #[error("input file {0} not found")]
    NotFound(String),

    #[error("output file {0} already exists")]
    AlreadyExists(String),

    #[error("output file {name} must have a {expected} extension ({allowed})")]
    InvalidExtension {
        name: String,
        expected: &'static str,
        allowed: String,
    },

    #[error("missing required parameter '{name}' for {kind}")]
    MissingParameter { kind: &'static str, name: &'static str },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown operation kind: {0}")]
    UnknownOperation(String),

    // ---- Codec compatibility oracle ----
    #[error("no audio stream found in {0}")]
    NoAudioStream(String),

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("audio codec '{codec}' cannot be copied into a .{container} container")]
    CodecIncompatible { container: String, codec: String },

    // ---- Filter templates / pipeline ----
    #[error("filter template '{0}' not found")]
    TemplateNotFound(String),

    #[error("failed to parse filter template: {0}")]
    TemplateParse(String),

    #[error("filter template selects no stages; nothing to do")]
    EmptyPipeline,

    // ---- External engine ----
    #[error("engine exited with code {exit_code}: {stderr}")]
    EngineFailed { exit_code: i32, stderr: String },

    #[error("failed to start {tool}: {source}")]
    CommandStart {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("required external tool not found: {0}")]
    DependencyNotFound(String),

    // ---- Infrastructure ----
    #[error("invalid path: {0}")]
    PathError(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for clipforge operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a tool that failed to launch.
pub(crate) fn command_start_error(tool: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart {
        tool: tool.into(),
        source,
    }
}

/// Translates a non-zero engine exit into an `EngineFailed` error.
///
/// A process killed by a signal has no exit code; -1 stands in so the
/// diagnostic text still reaches the caller.
pub(crate) fn engine_failed_error(
    status: std::process::ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::EngineFailed {
        exit_code: status.code().unwrap_or(-1),
        stderr: stderr.into(),
    }
}
