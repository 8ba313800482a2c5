// clipforge-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Clipforge: media operation toolkit",
    long_about = "Validates and runs media-editing operations (trim, merge, overlay, \
                  transforms, filter templates) against ffmpeg via clipforge-core."
)]
pub struct Cli {
    /// Directory containing the media artifacts to operate on
    #[arg(long, value_name = "DIR", env = "CLIPFORGE_MEDIA_ROOT")]
    pub media_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lists media files in the media root
    List,

    /// Prints raw stream/format metadata for a file as JSON
    Info {
        /// File to probe
        file: String,
    },

    /// Prints the duration of a file in seconds
    Duration {
        /// File to probe
        file: String,
    },

    /// Trims a video without re-encoding
    Trim {
        input: String,
        /// Start time (HH:MM:SS[.ms] or seconds)
        start: String,
        /// Duration (HH:MM:SS[.ms] or seconds)
        duration: String,
        output: String,
    },

    /// Concatenates videos without re-encoding
    Concat {
        /// Output file name
        #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
        output: String,
        /// Input files, in order (at least two)
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Merges a video track and an audio track into one file
    Merge {
        video: String,
        audio: String,
        output: String,
    },

    /// Extracts the audio track of a video
    ExtractAudio {
        input: String,
        output: String,
    },

    /// Replaces a video's audio track
    ReplaceAudio {
        video: String,
        audio: String,
        output: String,
    },

    /// Splits a video into fixed-duration segments
    Split {
        input: String,
        /// Segment duration in seconds
        segment_duration: f64,
        /// Output pattern containing a sequence token (e.g. part_%03d.mp4)
        output: String,
    },

    /// Applies a fade-in or fade-out
    Fade {
        input: String,
        /// Fade direction: in or out
        direction: String,
        /// Fade start time in seconds
        start: f64,
        /// Fade duration in seconds
        duration: f64,
        output: String,
    },

    /// Assembles an image sequence into a video
    ImagesToVideo {
        /// Input pattern (e.g. frame_%04d.png)
        pattern: String,
        /// Frames per second, 1-120
        framerate: f64,
        output: String,
    },

    /// Dumps a video's frames as an image sequence
    VideoToImages {
        input: String,
        /// Output pattern (e.g. frame_%04d.png)
        output: String,
    },

    /// Composites an image over a video
    Overlay {
        video: String,
        image: String,
        output: String,
        /// Position keyword: top-left, top-right, bottom-left, bottom-right, center
        #[arg(long, value_name = "POSITION")]
        position: String,
        /// Overlay opacity in [0, 1]
        #[arg(long, value_name = "OPACITY")]
        opacity: f64,
    },

    /// Crops the video frame
    Crop {
        input: String,
        output: String,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
        #[arg(long)]
        width: i64,
        #[arg(long)]
        height: i64,
    },

    /// Scales the video frame (-1/-2 preserve aspect)
    Scale {
        input: String,
        output: String,
        #[arg(long, allow_negative_numbers = true)]
        width: i64,
        #[arg(long, allow_negative_numbers = true)]
        height: i64,
    },

    /// Rotates the video by an angle in degrees
    Rotate {
        input: String,
        output: String,
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
    },

    /// Mirrors the video horizontally or vertically
    Flip {
        input: String,
        output: String,
        /// horizontal or vertical
        #[arg(long)]
        direction: String,
    },

    /// Transposes the video (0-3, ffmpeg transpose modes)
    Transpose {
        input: String,
        output: String,
        #[arg(long)]
        dir: i64,
    },

    /// Pads the video frame
    Pad {
        input: String,
        output: String,
        #[arg(long)]
        width: i64,
        #[arg(long)]
        height: i64,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
        /// Pad color (defaults to black)
        #[arg(long)]
        color: Option<String>,
    },

    /// Applies the built-in vintage grade in a single pass
    Vintage {
        input: String,
        output: String,
        /// eq contrast value
        #[arg(long, allow_negative_numbers = true, default_value_t = 1.1)]
        contrast: f64,
        /// eq saturation value in [0, 3]
        #[arg(long, default_value_t = 0.85)]
        saturation: f64,
        /// Vignette angle expression (e.g. PI/5)
        #[arg(long)]
        angle: String,
    },

    /// Applies a named filter template as a multi-stage pipeline
    Template {
        input: String,
        /// Template name (loaded from <media-root>/templates/<name>.json)
        name: String,
        output: String,
    },
}
