//! Core configuration for clipforge.
//!
//! Every operation resolves artifact names against a single configured media
//! root; filter templates live in a sibling directory unless overridden.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Configuration shared by all media operations.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory containing all media artifacts. Artifact names are base
    /// names resolved against this root; they never escape it.
    pub media_root: PathBuf,
    /// Directory containing filter template documents (`<name>.json`).
    pub template_dir: PathBuf,
}

impl CoreConfig {
    /// Creates a configuration rooted at `media_root`, with templates in
    /// `<media_root>/templates`.
    pub fn new(media_root: PathBuf) -> Self {
        let template_dir = media_root.join("templates");
        Self {
            media_root,
            template_dir,
        }
    }

    /// Validates the configuration. The media root must exist and be a
    /// directory; the template directory is optional until a template
    /// operation is requested.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.media_root.exists() {
            return Err(CoreError::Config(format!(
                "media root {} does not exist",
                self.media_root.display()
            )));
        }
        if !self.media_root.is_dir() {
            return Err(CoreError::Config(format!(
                "media root {} is not a directory",
                self.media_root.display()
            )));
        }
        Ok(())
    }
}
