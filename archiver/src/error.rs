use std::path::PathBuf;

use thiserror::Error;

use crate::reddit::ApiError;

pub const EXIT_CONFIGURATION: i32 = 1;
pub const EXIT_FETCH: i32 = 2;
pub const EXIT_COMPRESSION: i32 = 3;

/// Run-level failures. Anything that ends up here aborts the run; per-item
/// problems (one submission, one wiki page) are logged and never reach it.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("failed to fetch {what}: {source}")]
    FoundationalFetch {
        what: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("archive path already exists: {}", .0.display())]
    PathConflict(PathBuf),

    #[error("failed to compress archive: {0}")]
    Compression(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl ArchiveError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            context: context.into(),
            source,
        }
    }

    /// Wraps a failed file write; `error` keeps its whole context chain.
    pub fn write(path: impl Into<PathBuf>, error: anyhow::Error) -> Self {
        ArchiveError::Write {
            path: path.into(),
            reason: format!("{:#}", error),
        }
    }

    /// Process exit code reported by the `archiver` binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArchiveError::Configuration(_) => EXIT_CONFIGURATION,
            ArchiveError::Compression(_) => EXIT_COMPRESSION,
            _ => EXIT_FETCH,
        }
    }
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
