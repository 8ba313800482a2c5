//! Core library for the clipforge media operation toolkit.
//!
//! Exposes a catalog of media-editing operations (trim, merge, overlay,
//! geometric transforms, vintage-style filter templates) realized by
//! invoking ffmpeg/ffprobe as external processes. Every operation validates
//! its request against a parameter schema, resolves codec/container
//! compatibility where stream copies are involved, compiles filter-graph
//! expressions, and for composite templates sequences multiple invocations
//! through a pipeline with atomic finalization and guaranteed cleanup.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clipforge_core::{CoreConfig, SidecarSpawner, operations};
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(PathBuf::from("/path/to/media"));
//! config.validate().unwrap();
//!
//! let spawner = SidecarSpawner;
//! let produced = operations::trim(
//!     &config, &spawner, "clip.mp4", "00:00:05", "00:00:30", "short.mp4",
//! ).unwrap();
//! println!("produced {produced}");
//! ```

pub mod artifact;
pub mod compat;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod filters;
pub mod operations;
pub mod pipeline;
pub mod schema;
pub mod temp_files;
pub mod templates;
pub mod utils;

// Re-exports for public API
pub use config::CoreConfig;
pub use discovery::list_media_files;
pub use error::{CoreError, CoreResult};
pub use external::{
    CodecProber, FfprobeProber, SidecarSpawner, check_dependency, media_duration, raw_metadata,
};
pub use filters::{FadeDirection, FlipDirection, OverlayPosition, Transform};
pub use schema::{Params, TransformKind};
pub use templates::FilterTemplate;
