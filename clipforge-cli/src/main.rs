// clipforge-cli/src/main.rs
//
// Command-line entry point. Parses arguments, configures logging and the
// core library, dispatches one operation, and reports the result: a success
// message naming the produced artifact, or the first validation/execution
// failure encountered.

use clap::Parser;
use clipforge_core::{
    CoreConfig, CoreError, CoreResult, FfprobeProber, Params, SidecarSpawner, TransformKind,
    artifact, check_dependency, list_media_files, media_duration, operations, raw_metadata,
};
use serde_json::json;
use std::process;

mod cli;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("Operation failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> CoreResult<()> {
    let config = CoreConfig::new(cli.media_root);
    config.validate()?;
    log::debug!("Media root: {}", config.media_root.display());
    let spawner = SidecarSpawner;
    let prober = FfprobeProber;

    match cli.command {
        Commands::List => {
            for file in list_media_files(&config)? {
                println!("{file}");
            }
        }

        Commands::Info { file } => {
            check_dependency("ffprobe")?;
            let path = resolve_existing(&config, &file)?;
            let metadata = raw_metadata(&path)?;
            let text = serde_json::to_string_pretty(&metadata)
                .map_err(|e| CoreError::ProbeFailed(format!("metadata formatting: {e}")))?;
            println!("{text}");
        }

        Commands::Duration { file } => {
            check_dependency("ffprobe")?;
            let path = resolve_existing(&config, &file)?;
            println!("{}", media_duration(&path)?);
        }

        Commands::Trim { input, start, duration, output } => {
            check_dependency("ffmpeg")?;
            let out = operations::trim(&config, &spawner, &input, &start, &duration, &output)?;
            println!("Successfully trimmed video to {out}");
        }

        Commands::Concat { output, inputs } => {
            check_dependency("ffmpeg")?;
            let out = operations::concatenate(&config, &spawner, &inputs, &output)?;
            println!("Successfully concatenated videos to {out}");
        }

        Commands::Merge { video, audio, output } => {
            check_dependency("ffmpeg")?;
            check_dependency("ffprobe")?;
            let out = operations::merge(&config, &spawner, &prober, &video, &audio, &output)?;
            println!("Successfully merged audio and video to {out}");
        }

        Commands::ExtractAudio { input, output } => {
            check_dependency("ffmpeg")?;
            let out = operations::extract_audio(&config, &spawner, &input, &output)?;
            println!("Successfully extracted audio to {out}");
        }

        Commands::ReplaceAudio { video, audio, output } => {
            check_dependency("ffmpeg")?;
            check_dependency("ffprobe")?;
            let out =
                operations::replace_audio(&config, &spawner, &prober, &video, &audio, &output)?;
            println!("Successfully replaced audio in {out}");
        }

        Commands::Split { input, segment_duration, output } => {
            check_dependency("ffmpeg")?;
            let out = operations::split(&config, &spawner, &input, segment_duration, &output)?;
            println!("Successfully split video into segments at {out}");
        }

        Commands::Fade { input, direction, start, duration, output } => {
            check_dependency("ffmpeg")?;
            let out =
                operations::fade(&config, &spawner, &input, &direction, start, duration, &output)?;
            println!("Successfully applied fade to {out}");
        }

        Commands::ImagesToVideo { pattern, framerate, output } => {
            check_dependency("ffmpeg")?;
            let out =
                operations::images_to_video(&config, &spawner, &pattern, framerate, &output)?;
            println!("Successfully assembled video to {out}");
        }

        Commands::VideoToImages { input, output } => {
            check_dependency("ffmpeg")?;
            let out = operations::video_to_images(&config, &spawner, &input, &output)?;
            println!("Successfully extracted frames to {out}");
        }

        Commands::Overlay { video, image, output, position, opacity } => {
            check_dependency("ffmpeg")?;
            let mut params = Params::new();
            params.insert("position".to_string(), json!(position));
            params.insert("opacity".to_string(), json!(opacity));
            let out =
                operations::overlay_image(&config, &spawner, &video, &image, &params, &output)?;
            println!("Successfully applied overlay to {out}");
        }

        Commands::Crop { input, output, x, y, width, height } => {
            let params = params_from([
                ("x", json!(x)),
                ("y", json!(y)),
                ("width", json!(width)),
                ("height", json!(height)),
            ]);
            run_transform(&config, &spawner, &input, TransformKind::Crop, params, &output)?;
        }

        Commands::Scale { input, output, width, height } => {
            let params = params_from([("width", json!(width)), ("height", json!(height))]);
            run_transform(&config, &spawner, &input, TransformKind::Scale, params, &output)?;
        }

        Commands::Rotate { input, output, angle } => {
            let params = params_from([("angle", json!(angle))]);
            run_transform(&config, &spawner, &input, TransformKind::Rotate, params, &output)?;
        }

        Commands::Flip { input, output, direction } => {
            let params = params_from([("direction", json!(direction))]);
            run_transform(&config, &spawner, &input, TransformKind::Flip, params, &output)?;
        }

        Commands::Transpose { input, output, dir } => {
            let params = params_from([("dir", json!(dir))]);
            run_transform(&config, &spawner, &input, TransformKind::Transpose, params, &output)?;
        }

        Commands::Pad { input, output, width, height, x, y, color } => {
            let mut params = params_from([
                ("width", json!(width)),
                ("height", json!(height)),
                ("x", json!(x)),
                ("y", json!(y)),
            ]);
            if let Some(color) = color {
                params.insert("color".to_string(), json!(color));
            }
            run_transform(&config, &spawner, &input, TransformKind::Pad, params, &output)?;
        }

        Commands::Vintage { input, output, contrast, saturation, angle } => {
            check_dependency("ffmpeg")?;
            let out = operations::vintage(
                &config, &spawner, &input, contrast, saturation, &angle, &output,
            )?;
            println!("Successfully applied vintage grade to {out}");
        }

        Commands::Template { input, name, output } => {
            check_dependency("ffmpeg")?;
            let out = operations::apply_filter_template(&config, &spawner, &input, &name, &output)?;
            println!("Successfully applied template '{name}' to {out}");
        }
    }

    Ok(())
}

fn run_transform(
    config: &CoreConfig,
    spawner: &SidecarSpawner,
    input: &str,
    kind: TransformKind,
    params: Params,
    output: &str,
) -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    let out = operations::transform(config, spawner, input, kind, &params, output)?;
    println!("Successfully applied {} to {out}", kind.name());
    Ok(())
}

fn params_from<const N: usize>(pairs: [(&str, serde_json::Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn resolve_existing(config: &CoreConfig, name: &str) -> CoreResult<std::path::PathBuf> {
    artifact::ensure_safe_name(name)?;
    let path = artifact::resolve(config, name);
    if !path.exists() {
        return Err(CoreError::NotFound(name.to_string()));
    }
    Ok(path)
}
