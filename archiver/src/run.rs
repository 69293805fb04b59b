//! One archive run, start to finish.

use chrono::Utc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::cli::RunConfig;
use crate::community::archive_community_info;
use crate::compress::{compress_archive, CompressionOutcome};
use crate::error::{ArchiveResult, EXIT_COMPRESSION};
use crate::layout::ArchiveLayout;
use crate::metadata::write_metadata;
use crate::reddit::Community;
use crate::submissions::archive_submissions;
use crate::wiki::archive_wiki;

/// Items that failed and were skipped during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCounts {
    pub listings: usize,
    pub submissions: usize,
    pub wiki_pages: usize,
    pub wiki_revisions: usize,
}

impl FailureCounts {
    pub fn total(&self) -> usize {
        self.listings + self.submissions + self.wiki_pages + self.wiki_revisions
    }
}

/// State shared by every step of a run. Only `finished_at` and the failure
/// counters change after the run directory has been created.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: RunConfig,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub layout: ArchiveLayout,
    pub failures: FailureCounts,
}

impl RunContext {
    /// Creates the run directory for a run that started at `started_at`.
    pub fn start(config: RunConfig, started_at: i64) -> ArchiveResult<RunContext> {
        let layout = ArchiveLayout::build(&config, started_at)?;
        Ok(RunContext {
            config,
            started_at,
            finished_at: None,
            layout,
            failures: FailureCounts::default(),
        })
    }

    pub fn finish(&mut self, finished_at: i64) {
        self.finished_at = Some(finished_at.max(self.started_at));
    }
}

/// Result of a run that got as far as writing the final metadata.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub context: RunContext,
    pub submissions_archived: usize,
    pub wiki_files_written: usize,
    pub compression: Option<CompressionOutcome>,
}

impl RunSummary {
    /// Exit status for the binary. Per-item failures do not change it.
    pub fn exit_code(&self) -> i32 {
        match self.compression {
            Some(CompressionOutcome::Failed { .. }) => EXIT_COMPRESSION,
            _ => 0,
        }
    }
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Archives `community` according to `config`. `started_at` is the clock
/// reading taken when the process launched.
pub fn run(config: RunConfig, started_at: i64, community: &dyn Community) -> ArchiveResult<RunSummary> {
    let mut ctx = RunContext::start(config, started_at)?;

    write_metadata(&ctx)?;
    archive_community_info(community, &ctx.layout)?;

    let mut submissions_archived = 0;
    if ctx.config.submissions {
        submissions_archived = archive_submissions(community, &mut ctx);
    }

    let mut wiki_files_written = 0;
    if ctx.config.wiki {
        wiki_files_written = archive_wiki(community, &mut ctx);
    }

    ctx.finish(now());
    write_metadata(&ctx)?;

    if ctx.failures.total() > 0 {
        warn!(
            "Archive of r/{} completed with {} skipped item(s): {:?}",
            ctx.config.subreddit,
            ctx.failures.total(),
            ctx.failures
        );
    }

    let compression = if ctx.config.compress {
        let outcome = compress_archive(&ctx);
        if let CompressionOutcome::Failed { reason } = &outcome {
            error!("Something went wrong compressing the archive: {}", reason);
        }
        Some(outcome)
    } else {
        None
    };

    info!(
        "Finished r/{}: {} submissions, {} wiki files",
        ctx.config.subreddit, submissions_archived, wiki_files_written
    );

    Ok(RunSummary {
        context: ctx,
        submissions_archived,
        wiki_files_written,
        compression,
    })
}
