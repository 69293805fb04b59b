use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::RunConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::io::write_json;
use crate::run::{FailureCounts, RunContext};

/// Contents of `archiveData.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub archived_at: i64,
    pub started_at: i64,
    pub archived_with: String,
    pub subreddit: String,
    pub command_line_arguments: RunConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<FailureCounts>,
}

pub fn archived_with() -> String {
    format!("SubredditArchiver v{}", env!("CARGO_PKG_VERSION"))
}

impl ArchiveMetadata {
    pub fn from_context(ctx: &RunContext) -> ArchiveMetadata {
        ArchiveMetadata {
            archived_at: ctx.started_at,
            started_at: ctx.started_at,
            archived_with: archived_with(),
            subreddit: ctx.config.subreddit.clone(),
            command_line_arguments: ctx.config.clone(),
            finished_at: ctx.finished_at,
            extra_data: ctx.config.meta_extra.clone(),
            failures: ctx.finished_at.map(|_| ctx.failures),
        }
    }
}

/// Overwrites `archiveData.json` with the current state of the run.
pub fn write_metadata(ctx: &RunContext) -> ArchiveResult<()> {
    let path = ctx.layout.metadata_file();
    let metadata = ArchiveMetadata::from_context(ctx);
    write_json(&path, &metadata).map_err(|e| ArchiveError::write(&path, e))
}
