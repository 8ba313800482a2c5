//! Pipeline executor for composite filter-template operations.
//!
//! Runs an ordered stage list as sequential engine invocations, each stage
//! reading the previous stage's artifact and writing a freshly named
//! temporary. The final temporary is renamed onto the requested output, so
//! the output either fully exists with final content or does not exist at
//! all. Every temporary is deleted on every exit path: superseded temps as
//! soon as the next stage lands, and all remaining temps when a stage fails.

use crate::artifact;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, engine_failed_error};
use crate::external::{self, EngineSpawner};
use crate::temp_files;
use std::fs;
use std::path::{Path, PathBuf};

/// One engine invocation within a composite pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    /// Short name for logs and temp-file prefixes.
    pub label: &'static str,
    /// Compiled filter-graph expression for this stage.
    pub filter: String,
}

/// Tracks live temporary artifacts and removes whatever is left when the
/// run ends, on every exit path.
#[derive(Default)]
struct TempGuard {
    paths: Vec<PathBuf>,
}

impl TempGuard {
    fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    fn untrack(&mut self, path: &Path) {
        self.paths.retain(|p| p != path);
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    log::warn!("Failed to remove stage artifact {}: {e}", path.display());
                }
            }
        }
    }
}

/// Executes `stages` over `input_name`, finalizing into `output_name`.
///
/// The caller has already validated both artifact names. An empty stage
/// list is rejected as a no-op rather than silently copying the input.
pub fn run_pipeline<S: EngineSpawner>(
    spawner: &S,
    config: &CoreConfig,
    input_name: &str,
    output_name: &str,
    stages: &[Stage],
) -> CoreResult<()> {
    if stages.is_empty() {
        return Err(CoreError::EmptyPipeline);
    }

    let input_path = artifact::resolve(config, input_name);
    let output_path = artifact::resolve(config, output_name);
    let ext = artifact::extension_of(output_name)
        .ok_or_else(|| CoreError::PathError(format!("output {output_name} has no extension")))?;

    let mut guard = TempGuard::default();
    let mut src = input_path.clone();

    for (i, stage) in stages.iter().enumerate() {
        let dst = temp_files::temp_artifact_path(
            &config.media_root,
            &format!("clipforge_{}", stage.label),
            &ext,
        );
        guard.track(dst.clone());

        log::info!(
            "Pipeline stage {}/{} ({}): {}",
            i + 1,
            stages.len(),
            stage.label,
            stage.filter
        );

        let args = stage_args(&src, &stage.filter, &dst);
        let output = external::invoke(spawner, &args)?;
        if !output.status.success() {
            log::error!(
                "Pipeline stage {} ({}) failed with {}",
                i + 1,
                stage.label,
                output.status
            );
            // TempGuard removes every live temporary on the way out.
            return Err(engine_failed_error(output.status, output.stderr));
        }

        // The previous temporary is superseded by this stage's artifact.
        if src != input_path {
            fs::remove_file(&src)?;
            guard.untrack(&src);
        }
        src = dst;
    }

    // Rename, not copy: the output appears atomically under its final name.
    fs::rename(&src, &output_path)?;
    guard.untrack(&src);

    log::info!("Pipeline finalized into {output_name}");
    Ok(())
}

/// Argument list for one filter stage. Video is re-encoded through the
/// filter; audio is stream-copied.
fn stage_args(src: &Path, filter: &str, dst: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        src.to_string_lossy().into_owned(),
        "-vf".to_string(),
        filter.to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        dst.to_string_lossy().into_owned(),
    ]
}
