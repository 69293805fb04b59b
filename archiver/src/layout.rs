use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::cli::RunConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::io::create_fresh_dir;

pub const METADATA_FILE: &str = "archiveData.json";
pub const RULES_FILE: &str = "rules.json";
pub const SUBMISSIONS_DIR: &str = "submissions";
pub const WIKI_DIR: &str = "wiki";

/// Where one run writes its files:
/// `<output_dir>/<subreddit>/<started_at>/{submissions,wiki}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub base: PathBuf,
    pub submissions: PathBuf,
    pub wiki: PathBuf,
}

impl ArchiveLayout {
    pub fn compute(output_dir: &Path, subreddit: &str, started_at: i64) -> ArchiveLayout {
        let base = output_dir.join(subreddit).join(started_at.to_string());
        ArchiveLayout {
            submissions: base.join(SUBMISSIONS_DIR),
            wiki: base.join(WIKI_DIR),
            base,
        }
    }

    /// Computes the layout and creates the directories the run will use.
    /// Fails with [`ArchiveError::PathConflict`] when the run directory or
    /// the run's tarball already exists. A compressed run without `--keep`
    /// leaves only the tarball behind.
    pub fn build(config: &RunConfig, started_at: i64) -> ArchiveResult<ArchiveLayout> {
        let layout = ArchiveLayout::compute(&config.output_dir, &config.subreddit, started_at);

        let tarball = layout.tarball(&config.subreddit, started_at);
        if tarball.symlink_metadata().is_ok() {
            return Err(ArchiveError::PathConflict(tarball));
        }

        match create_fresh_dir(&layout.base) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(ArchiveError::PathConflict(layout.base));
            }
            Err(e) => {
                return Err(ArchiveError::io(
                    format!("Failed to create directory: {}", layout.base.display()),
                    e,
                ))
            }
        }

        if config.submissions {
            create_subdir(&layout.submissions)?;
        }
        if config.wiki {
            create_subdir(&layout.wiki)?;
        }

        info!("Archive directory: {}", layout.base.display());
        Ok(layout)
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.base.join(METADATA_FILE)
    }

    pub fn rules_file(&self) -> PathBuf {
        self.base.join(RULES_FILE)
    }

    pub fn info_file(&self, display_name: &str) -> PathBuf {
        self.base.join(format!("{}.json", display_name))
    }

    pub fn submission_file(&self, id: &str) -> PathBuf {
        self.submissions.join(format!("{}.json", id))
    }

    /// `<subreddit>.<started_at>.tar.gz`, next to the run directory.
    pub fn tarball(&self, subreddit: &str, started_at: i64) -> PathBuf {
        let parent = self.base.parent().unwrap_or_else(|| Path::new("."));
        parent.join(format!("{}.{}.tar.gz", subreddit, started_at))
    }
}

fn create_subdir(path: &Path) -> ArchiveResult<()> {
    fs::create_dir_all(path)
        .map_err(|e| ArchiveError::io(format!("Failed to create directory: {}", path.display()), e))
}
