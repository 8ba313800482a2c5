//! Media artifact listing.
//!
//! Read-only query over the top level of the media root, filtered by the
//! media extension allow-lists. Subdirectories are not searched: artifacts
//! live directly under the root.

use crate::artifact;
use crate::config::CoreConfig;
use crate::error::CoreResult;

/// Lists the media artifact names in the configured media root, sorted.
pub fn list_media_files(config: &CoreConfig) -> CoreResult<Vec<String>> {
    let read_dir = std::fs::read_dir(&config.media_root)?;
    let mut files: Vec<String> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if !entry.path().is_file() {
                return None;
            }
            let name = entry.file_name().into_string().ok()?;
            artifact::is_media_name(&name).then_some(name)
        })
        .collect();

    files.sort();
    Ok(files)
}
