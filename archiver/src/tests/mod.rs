use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::RunConfig;

pub mod comments_tests;
pub mod fake;
pub mod fixtures;
pub mod flatten_tests;

/// A config for the "test" subreddit writing below `output_dir`, with no
/// throttling and everything but compression switched on.
pub fn test_config(output_dir: &Path) -> RunConfig {
    let mut config = RunConfig::new("test");
    config.output_dir = output_dir.to_path_buf();
    config.compress = false;
    config.revision_delay = Duration::ZERO;
    config
}

/// Every regular file below `root`, relative to it, with `/` separators, sorted.
pub fn relative_files(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, files: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path: PathBuf = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, files);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                files.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}
