//! Temporary artifact naming.
//!
//! Stage artifacts are never given fixed literal names: each path carries a
//! random suffix so concurrent pipeline runs in the same media root cannot
//! collide or corrupt each other's intermediate state.

use std::path::{Path, PathBuf};

/// Returns a temporary artifact path with a random suffix. Does not create
/// the file; the engine writes it.
pub fn temp_artifact_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_unique_per_call() {
        let dir = Path::new("/tmp");
        let a = temp_artifact_path(dir, "stage0", "mp4");
        let b = temp_artifact_path(dir, "stage0", "mp4");
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with("stage0_"));
        assert!(a.extension().unwrap() == "mp4");
    }
}
