use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{error, info};

use crate::error::{ArchiveError, ArchiveResult};
use crate::run::RunContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    Compressed {
        tarball: PathBuf,
        /// Whether the uncompressed run directory was deleted afterwards.
        removed_directory: bool,
    },
    /// The run directory is untouched whatever `--keep` says.
    Failed { reason: String },
}

/// Writes `base` into `tarball` as a gzip-compressed tar, stored under the
/// base directory's own name. An existing file at `tarball` is never
/// touched; a tarball this call created is removed again if writing it fails.
pub fn build_tarball(base: &Path, tarball: &Path) -> ArchiveResult<()> {
    let dir_name = base
        .file_name()
        .ok_or_else(|| ArchiveError::Compression(format!("{} has no name", base.display())))?;

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tarball)
        .map_err(|e| compression_error("cannot create", tarball, e))?;

    if let Err(e) = write_tarball(file, dir_name, base, tarball) {
        if let Err(remove_error) = fs::remove_file(tarball) {
            error!(
                "Failed to remove partial archive {}: {}",
                tarball.display(),
                remove_error
            );
        }
        return Err(e);
    }

    Ok(())
}

fn write_tarball(file: File, dir_name: &OsStr, base: &Path, tarball: &Path) -> ArchiveResult<()> {
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(dir_name, base)
        .map_err(|e| compression_error("cannot add files to", tarball, e))?;
    let encoder = builder
        .into_inner()
        .map_err(|e| compression_error("cannot finish", tarball, e))?;
    encoder
        .finish()
        .map_err(|e| compression_error("cannot flush", tarball, e))?;

    Ok(())
}

fn compression_error(stage: &str, tarball: &Path, e: std::io::Error) -> ArchiveError {
    ArchiveError::Compression(format!("{} {}: {}", stage, tarball.display(), e))
}

/// Bundles the run directory into `<subreddit>.<started_at>.tar.gz` and,
/// unless the operator asked to keep it, removes the directory. A failed
/// compression leaves the run directory in place.
pub fn compress_archive(ctx: &RunContext) -> CompressionOutcome {
    let base = &ctx.layout.base;
    let tarball = ctx.layout.tarball(&ctx.config.subreddit, ctx.started_at);
    info!("Compressing {} into {}", base.display(), tarball.display());

    if let Err(e) = build_tarball(base, &tarball) {
        return CompressionOutcome::Failed {
            reason: e.to_string(),
        };
    }

    let mut removed_directory = false;
    if !ctx.config.keep {
        match fs::remove_dir_all(base) {
            Ok(()) => removed_directory = true,
            Err(e) => error!("Failed to remove {}: {}", base.display(), e),
        }
    }

    println!("Archive written to {}", tarball.display());
    CompressionOutcome::Compressed {
        tarball,
        removed_directory,
    }
}
