//! The media operation catalog: validate, compile, invoke.
//!
//! Each operation runs the same strict validation sequence before anything
//! touches the engine: artifact name safety, input existence, output
//! collision, output extension, then operation-specific parameter checks.
//! The first failure is returned as-is; later checks never mask it. Only a
//! fully validated request reaches the engine gateway.

use crate::artifact::{self, MediaCategory};
use crate::compat;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, engine_failed_error};
use crate::external::{self, CodecProber, EngineSpawner};
use crate::filters::{self, FadeDirection};
use crate::pipeline;
use crate::schema::{self, Params, TransformKind};
use crate::templates;
use crate::utils;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Runs the ordered file-safety checks shared by every operation and
/// resolves the artifact paths. Check order is part of the contract:
/// unsafe name, then missing input, then output collision, then output
/// extension.
fn validate_io(
    config: &CoreConfig,
    inputs: &[&str],
    output: &str,
    category: MediaCategory,
) -> CoreResult<(Vec<PathBuf>, PathBuf)> {
    for name in inputs {
        artifact::ensure_safe_name(name)?;
    }
    artifact::ensure_safe_name(output)?;

    let mut input_paths = Vec::with_capacity(inputs.len());
    for name in inputs {
        let path = artifact::resolve(config, name);
        if !path.exists() {
            return Err(CoreError::NotFound(name.to_string()));
        }
        input_paths.push(path);
    }

    let output_path = artifact::resolve(config, output);
    if output_path.exists() {
        // Outputs are never overwritten; the caller must remove or rename
        // the prior result first.
        return Err(CoreError::AlreadyExists(output.to_string()));
    }

    artifact::ensure_extension(output, category)?;

    Ok((input_paths, output_path))
}

/// Invokes the engine and translates a non-zero exit into `EngineFailed`.
/// A partially written output is removed so failure leaves nothing behind.
fn run_engine<S: EngineSpawner>(
    spawner: &S,
    args: &[String],
    output_path: &Path,
) -> CoreResult<()> {
    let output = external::invoke(spawner, args)?;
    if !output.status.success() {
        if output_path.exists() {
            if let Err(e) = fs::remove_file(output_path) {
                log::warn!(
                    "Failed to remove partial output {}: {e}",
                    output_path.display()
                );
            }
        }
        return Err(engine_failed_error(output.status, output.stderr));
    }
    Ok(())
}

fn parse_time_param(name: &str, value: &str) -> CoreResult<f64> {
    utils::parse_timestamp(value).ok_or_else(|| {
        CoreError::InvalidParameter(format!(
            "{name} must be HH:MM:SS[.ms] or seconds; got '{value}'"
        ))
    })
}

/// Trims a video without re-encoding (stream copy).
pub fn trim<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    start: &str,
    duration: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Video)?;
    parse_time_param("start", start)?;
    let duration_secs = parse_time_param("duration", duration)?;
    if duration_secs <= 0.0 {
        return Err(CoreError::InvalidParameter(format!(
            "duration must be positive; got '{duration}'"
        )));
    }

    log::info!("Trimming {input} ({start} + {duration}) -> {output}");
    let args = vec![
        "-ss".to_string(),
        start.to_string(),
        "-t".to_string(),
        duration.to_string(),
        "-i".to_string(),
        path_str(&inputs[0]),
        "-c".to_string(),
        "copy".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Concatenates videos without re-encoding via the concat demuxer.
pub fn concatenate<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    inputs: &[String],
    output: &str,
) -> CoreResult<String> {
    if inputs.len() < 2 {
        return Err(CoreError::InvalidParameter(
            "concatenate requires at least two inputs".to_string(),
        ));
    }
    let input_names: Vec<&str> = inputs.iter().map(String::as_str).collect();
    let (input_paths, output_path) =
        validate_io(config, &input_names, output, MediaCategory::Video)?;

    // The concat demuxer reads its inputs from a list file; the temp file
    // is removed when dropped, after the invocation completes.
    let mut list_file = tempfile::Builder::new()
        .prefix("clipforge_concat_")
        .suffix(".txt")
        .tempfile_in(&config.media_root)?;
    for path in &input_paths {
        writeln!(list_file, "file '{}'", path_str(path))?;
    }
    list_file.flush()?;

    log::info!("Concatenating {} inputs -> {output}", inputs.len());
    let args = vec![
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        path_str(list_file.path()),
        "-c".to_string(),
        "copy".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Merges a video track and an audio track into one container, stream-copy.
/// The audio codec is probed and checked against the output container's
/// compatibility matrix before the engine runs.
pub fn merge<S: EngineSpawner, P: CodecProber>(
    config: &CoreConfig,
    spawner: &S,
    prober: &P,
    video: &str,
    audio: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) =
        validate_io(config, &[video, audio], output, MediaCategory::Video)?;
    check_audio_copy_compat(prober, &inputs[1], output)?;

    log::info!("Merging {video} + {audio} -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        "-i".to_string(),
        path_str(&inputs[1]),
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Replaces a video's audio track with another audio artifact, keeping the
/// video stream untouched. Oracle-gated like merge.
pub fn replace_audio<S: EngineSpawner, P: CodecProber>(
    config: &CoreConfig,
    spawner: &S,
    prober: &P,
    video: &str,
    audio: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) =
        validate_io(config, &[video, audio], output, MediaCategory::Video)?;
    check_audio_copy_compat(prober, &inputs[1], output)?;

    log::info!("Replacing audio of {video} with {audio} -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        "-i".to_string(),
        path_str(&inputs[1]),
        "-map".to_string(),
        "0:v".to_string(),
        "-map".to_string(),
        "1:a".to_string(),
        "-c:v".to_string(),
        "copy".to_string(),
        "-shortest".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Extracts the audio track of a video, stream-copy, into an audio container.
pub fn extract_audio<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Audio)?;

    log::info!("Extracting audio from {input} -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        "-vn".to_string(),
        "-acodec".to_string(),
        "copy".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Splits a video into fixed-duration segments without re-encoding. The
/// output name is a pattern containing a `%d`/`%0Nd` sequence token.
pub fn split<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    segment_duration: f64,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Video)?;
    if !utils::has_sequence_token(output) {
        return Err(CoreError::InvalidParameter(format!(
            "split output must contain a sequence token like %03d; got '{output}'"
        )));
    }
    if !(segment_duration.is_finite() && segment_duration > 0.0) {
        return Err(CoreError::InvalidParameter(format!(
            "segment duration must be positive; got {segment_duration}"
        )));
    }

    log::info!("Splitting {input} into {segment_duration}s segments -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        "-c".to_string(),
        "copy".to_string(),
        "-f".to_string(),
        "segment".to_string(),
        "-segment_time".to_string(),
        segment_duration.to_string(),
        "-reset_timestamps".to_string(),
        "1".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Applies a fade-in or fade-out, re-encoding the video stream.
pub fn fade<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    direction: &str,
    start: f64,
    duration: f64,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Video)?;
    let direction: FadeDirection = direction.parse()?;
    if !(start.is_finite() && start >= 0.0) {
        return Err(CoreError::InvalidParameter(format!(
            "fade start must be non-negative; got {start}"
        )));
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(CoreError::InvalidParameter(format!(
            "fade duration must be positive; got {duration}"
        )));
    }

    let expr = filters::fade_expr(direction, start, duration);
    log::info!("Fading {input} ({expr}) -> {output}");
    let args = filter_args(&inputs[0], &expr, &output_path);
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Assembles an image sequence into a video. The input is a printf-style
/// pattern (`frame_%04d.png`) rather than a single artifact, so it is
/// validated lexically instead of stat'ed.
pub fn images_to_video<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    pattern: &str,
    framerate: f64,
    output: &str,
) -> CoreResult<String> {
    artifact::ensure_safe_name(pattern)?;
    artifact::ensure_safe_name(output)?;
    if !utils::has_sequence_token(pattern) {
        return Err(CoreError::InvalidParameter(format!(
            "input pattern must contain a sequence token like %04d; got '{pattern}'"
        )));
    }
    artifact::ensure_extension(pattern, MediaCategory::ImageSequence)
        .map_err(|_| {
            CoreError::InvalidParameter(format!(
                "input pattern must name .png or .jpg frames; got '{pattern}'"
            ))
        })?;
    let output_path = artifact::resolve(config, output);
    if output_path.exists() {
        return Err(CoreError::AlreadyExists(output.to_string()));
    }
    artifact::ensure_extension(output, MediaCategory::Video)?;
    if !(1.0..=120.0).contains(&framerate) {
        return Err(CoreError::InvalidParameter(format!(
            "framerate must be in [1, 120]; got {framerate}"
        )));
    }

    log::info!("Assembling {pattern} at {framerate} fps -> {output}");
    let args = vec![
        "-framerate".to_string(),
        framerate.to_string(),
        "-i".to_string(),
        path_str(&artifact::resolve(config, pattern)),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Dumps a video's frames as an image sequence.
pub fn video_to_images<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) =
        validate_io(config, &[input], output, MediaCategory::ImageSequence)?;
    if !utils::has_sequence_token(output) {
        return Err(CoreError::InvalidParameter(format!(
            "output pattern must contain a sequence token like %04d; got '{output}'"
        )));
    }

    log::info!("Dumping frames of {input} -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Composites an image over a video at a symbolic position with the given
/// opacity.
pub fn overlay_image<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    video: &str,
    image: &str,
    params: &Params,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) =
        validate_io(config, &[video, image], output, MediaCategory::Video)?;
    let (position, opacity) = schema::build_overlay(params)?;

    let expr = filters::overlay_expr(position, opacity);
    log::info!("Overlaying {image} on {video} -> {output}");
    let args = vec![
        "-i".to_string(),
        path_str(&inputs[0]),
        "-i".to_string(),
        path_str(&inputs[1]),
        "-filter_complex".to_string(),
        expr,
        "-c:a".to_string(),
        "copy".to_string(),
        path_str(&output_path),
    ];
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Applies one geometric transform (crop, scale, rotate, flip, transpose,
/// pad), with parameters validated against the schema registry.
pub fn transform<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    kind: TransformKind,
    params: &Params,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Video)?;
    let plan = schema::build_transform(kind, params)?;

    let expr = plan.compile();
    log::info!("Applying {} ({expr}) to {input} -> {output}", plan.label());
    let args = filter_args(&inputs[0], &expr, &output_path);
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Curve triple for the built-in vintage grade: lifted warm midtones in
/// red, slightly crushed blue.
const VINTAGE_CURVES: (&str, &str, &str) = (
    "0/0.11 0.42/0.51 1/0.95",
    "0/0 0.50/0.48 1/1",
    "0/0.22 0.49/0.44 1/0.8",
);

/// Applies the fused vintage color grade (warm curves, contrast/saturation,
/// vignette) in a single invocation. The vignette angle is a required
/// parameter here, same as in the template path.
pub fn vintage<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    contrast: f64,
    saturation: f64,
    angle: &str,
    output: &str,
) -> CoreResult<String> {
    let (inputs, output_path) = validate_io(config, &[input], output, MediaCategory::Video)?;
    if !contrast.is_finite() {
        return Err(CoreError::InvalidParameter(format!(
            "contrast must be a finite number; got {contrast}"
        )));
    }
    if !(0.0..=3.0).contains(&saturation) {
        return Err(CoreError::InvalidParameter(format!(
            "saturation must be in [0, 3]; got {saturation}"
        )));
    }
    if angle.is_empty() {
        return Err(CoreError::InvalidParameter(
            "vignette angle must not be empty".to_string(),
        ));
    }

    let (red, green, blue) = VINTAGE_CURVES;
    let expr = [
        filters::curves_expr(red, green, blue),
        filters::eq_expr(contrast, saturation),
        filters::vignette_expr(angle),
    ]
    .join(",");

    log::info!("Applying vintage grade ({expr}) to {input} -> {output}");
    let args = filter_args(&inputs[0], &expr, &output_path);
    run_engine(spawner, &args, &output_path)?;
    Ok(output.to_string())
}

/// Applies a named filter template as a multi-stage pipeline.
pub fn apply_filter_template<S: EngineSpawner>(
    config: &CoreConfig,
    spawner: &S,
    input: &str,
    template_name: &str,
    output: &str,
) -> CoreResult<String> {
    validate_io(config, &[input], output, MediaCategory::Video)?;
    let template = templates::load_template(config, template_name)?;
    let stages = template.plan();

    log::info!(
        "Applying template '{template_name}' ({} stages) to {input} -> {output}",
        stages.len()
    );
    pipeline::run_pipeline(spawner, config, input, output, &stages)?;
    Ok(output.to_string())
}

fn check_audio_copy_compat<P: CodecProber>(
    prober: &P,
    audio_path: &Path,
    output: &str,
) -> CoreResult<()> {
    let codec = prober.audio_codec(audio_path)?;
    if let Some(ext) = artifact::extension_of(output) {
        compat::check_compatibility(&ext, &codec)?;
    }
    Ok(())
}

fn filter_args(input: &Path, expr: &str, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_str(input),
        "-vf".to_string(),
        expr.to_string(),
        "-c:a".to_string(),
        "copy".to_string(),
        path_str(output),
    ]
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockCodecProber, MockEngineSpawner, MockInvocation};
    use serde_json::json;
    use std::fs::File;
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, CoreConfig) {
        let dir = tempdir().unwrap();
        let config = CoreConfig::new(dir.path().to_path_buf());
        (dir, config)
    }

    #[test]
    fn test_trim_invokes_stream_copy() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        let produced =
            trim(&config, &spawner, "in.mp4", "00:00:05", "00:00:10", "out.mp4").unwrap();
        assert_eq!(produced, "out.mp4");
        assert!(dir.path().join("out.mp4").exists());

        let calls = spawner.received_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], "-ss");
        assert_eq!(calls[0][1], "00:00:05");
        assert_eq!(calls[0][2], "-t");
        assert_eq!(calls[0][3], "00:00:10");
        assert_eq!(calls[0][6], "-c");
        assert_eq!(calls[0][7], "copy");
    }

    #[test]
    fn test_unsafe_name_checked_before_anything_else() {
        let (_dir, config) = setup();
        // No files exist at all; the name check still fires first.
        let spawner = MockEngineSpawner::new(vec![]);
        match trim(&config, &spawner, "../in.mp4", "0", "1", "out.mp4") {
            Err(CoreError::UnsafeName(name)) => assert_eq!(name, "../in.mp4"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_missing_input_before_output_collision() {
        let (dir, config) = setup();
        File::create(dir.path().join("out.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        match trim(&config, &spawner, "in.mp4", "0", "1", "out.mp4") {
            Err(CoreError::NotFound(name)) => assert_eq!(name, "in.mp4"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_collision_before_extension_and_parameters() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();
        // Bad extension AND pre-existing file AND bogus times: collision wins.
        File::create(dir.path().join("out.txt")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        match trim(&config, &spawner, "in.mp4", "bogus", "also-bogus", "out.txt") {
            Err(CoreError::AlreadyExists(name)) => assert_eq!(name, "out.txt"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_extension_before_parameters() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        match trim(&config, &spawner, "in.mp4", "bogus", "1", "out.txt") {
            Err(CoreError::InvalidExtension { name, .. }) => assert_eq!(name, "out.txt"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_time_rejected_without_invocation() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        assert!(matches!(
            trim(&config, &spawner, "in.mp4", "bogus", "1", "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(matches!(
            trim(&config, &spawner, "in.mp4", "0", "0", "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_engine_failure_removes_partial_output() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation {
            exit_code: 1,
            stderr_lines: vec!["moov atom not found".to_string()],
            create_output: false,
        }]);

        match trim(&config, &spawner, "in.mp4", "0", "1", "out.mp4") {
            Err(CoreError::EngineFailed { exit_code, stderr }) => {
                assert_eq!(exit_code, 1);
                assert!(stderr.contains("moov atom"));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!dir.path().join("out.mp4").exists());
    }

    #[test]
    fn test_concatenate_requires_two_inputs() {
        let (dir, config) = setup();
        File::create(dir.path().join("a.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        assert!(matches!(
            concatenate(&config, &spawner, &["a.mp4".to_string()], "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_concatenate_builds_list_file() {
        let (dir, config) = setup();
        File::create(dir.path().join("a.mp4")).unwrap();
        File::create(dir.path().join("b.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        concatenate(
            &config,
            &spawner,
            &["a.mp4".to_string(), "b.mp4".to_string()],
            "out.mp4",
        )
        .unwrap();

        let calls = spawner.received_calls();
        assert_eq!(calls[0][0], "-f");
        assert_eq!(calls[0][1], "concat");
        assert!(dir.path().join("out.mp4").exists());
        // The list file is gone once the operation returns.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.unwrap().file_name().into_string().ok())
            .filter(|n| n.starts_with("clipforge_concat_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_merge_incompatible_codec_never_reaches_engine() {
        let (dir, config) = setup();
        File::create(dir.path().join("v.mp4")).unwrap();
        File::create(dir.path().join("a.flac")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        let prober = MockCodecProber::with_codec("flac");
        match merge(&config, &spawner, &prober, "v.mp4", "a.flac", "out.mp4") {
            Err(CoreError::CodecIncompatible { container, codec }) => {
                assert_eq!(container, "mp4");
                assert_eq!(codec, "flac");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(spawner.received_calls().is_empty());
        assert!(!dir.path().join("out.mp4").exists());
    }

    #[test]
    fn test_merge_runs_once_codec_is_allowed() {
        let (dir, config) = setup();
        File::create(dir.path().join("v.mp4")).unwrap();
        File::create(dir.path().join("a.aac")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        let prober = MockCodecProber::with_codec("aac");
        merge(&config, &spawner, &prober, "v.mp4", "a.aac", "out.mp4").unwrap();

        let calls = spawner.received_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(&"-map".to_string()));
        assert!(dir.path().join("out.mp4").exists());
    }

    #[test]
    fn test_replace_audio_without_audio_stream() {
        let (dir, config) = setup();
        File::create(dir.path().join("v.mp4")).unwrap();
        File::create(dir.path().join("silent.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        let prober = MockCodecProber::no_audio();
        assert!(matches!(
            replace_audio(&config, &spawner, &prober, "v.mp4", "silent.mp4", "out.mp4"),
            Err(CoreError::NoAudioStream(_))
        ));
        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_split_requires_sequence_token() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        assert!(matches!(
            split(&config, &spawner, "in.mp4", 10.0, "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_transform_schema_failures_precede_invocation() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);

        let mut params = Params::new();
        params.insert("dir".to_string(), json!(9));
        assert!(matches!(
            transform(&config, &spawner, "in.mp4", TransformKind::Transpose, &params, "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));

        let params = Params::new();
        assert!(matches!(
            transform(&config, &spawner, "in.mp4", TransformKind::Crop, &params, "out.mp4"),
            Err(CoreError::MissingParameter { kind: "crop", .. })
        ));

        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_transform_compiles_expected_filter() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        let mut params = Params::new();
        params.insert("width".to_string(), json!(1280));
        params.insert("height".to_string(), json!(-2));
        transform(&config, &spawner, "in.mp4", TransformKind::Scale, &params, "out.mp4").unwrap();

        let calls = spawner.received_calls();
        assert_eq!(calls[0][2], "-vf");
        assert_eq!(calls[0][3], "scale=1280:-2");
    }

    #[test]
    fn test_vintage_fuses_color_stage() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        vintage(&config, &spawner, "in.mp4", 1.1, 0.85, "PI/5", "out.mp4").unwrap();

        let expr = &spawner.received_calls()[0][3];
        let (red, green, blue) = VINTAGE_CURVES;
        assert_eq!(
            expr,
            &format!(
                "curves=red='{red}':green='{green}':blue='{blue}',eq=contrast=1.1:saturation=0.85,vignette=angle=PI/5"
            )
        );
    }

    #[test]
    fn test_vintage_requires_explicit_angle() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        assert!(matches!(
            vintage(&config, &spawner, "in.mp4", 1.1, 0.85, "", "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_overlay_params_through_registry() {
        let (dir, config) = setup();
        File::create(dir.path().join("v.mp4")).unwrap();
        File::create(dir.path().join("logo.png")).unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        let mut params = Params::new();
        params.insert("position".to_string(), json!("center"));
        params.insert("opacity".to_string(), json!(1.5));
        assert!(matches!(
            overlay_image(&config, &spawner, "v.mp4", "logo.png", &params, "out.mp4"),
            Err(CoreError::InvalidParameter(_))
        ));
        assert!(spawner.received_calls().is_empty());
    }

    #[test]
    fn test_apply_template_empty_pipeline() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();
        std::fs::create_dir_all(&config.template_dir).unwrap();
        std::fs::write(config.template_dir.join("noop.json"), "{}").unwrap();

        let spawner = MockEngineSpawner::new(vec![]);
        assert!(matches!(
            apply_filter_template(&config, &spawner, "in.mp4", "noop", "out.mp4"),
            Err(CoreError::EmptyPipeline)
        ));
    }

    #[test]
    fn test_apply_template_end_to_end() {
        let (dir, config) = setup();
        File::create(dir.path().join("in.mp4")).unwrap();
        std::fs::create_dir_all(&config.template_dir).unwrap();
        std::fs::write(
            config.template_dir.join("grainy.json"),
            r#"{"noise": {"strength": 8, "flags": "t"}}"#,
        )
        .unwrap();

        let spawner = MockEngineSpawner::new(vec![MockInvocation::success()]);
        let produced =
            apply_filter_template(&config, &spawner, "in.mp4", "grainy", "out.mp4").unwrap();
        assert_eq!(produced, "out.mp4");
        assert!(dir.path().join("out.mp4").exists());
        assert_eq!(spawner.received_calls()[0][3], "noise=c0s=8:c0f=t");
    }
}
