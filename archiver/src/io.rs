use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tempfile::NamedTempFile;

/// Creates `path` and its parents. Unlike `create_dir_all`, an existing
/// leaf is an error so two runs never share a directory.
pub fn create_fresh_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir(path)
}

/// Writes `contents` next to `path` in a temporary file and renames it into
/// place, so readers only ever see a complete file.
pub fn write_atomically<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();
    let dir = path
        .parent()
        .with_context(|| format!("No parent directory for {}", path_str))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write {}", path_str))?;
    file.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush {}", path_str))?;
    file.persist(path)
        .with_context(|| format!("Failed to move {} into place", path_str))?;

    Ok(())
}

pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_atomically(path, json.as_bytes())
}

/// Writes `contents` to `path`, creating any missing parent directories.
pub fn write_with_parents<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    write_atomically(path, contents)
}
