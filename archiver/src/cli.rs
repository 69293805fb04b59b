use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ArchiveError, ArchiveResult};
use crate::reddit::{Credentials, DEFAULT_USER_AGENT};

pub const DEFAULT_OUTPUT_DIR: &str = "./archives";
pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_REVISION_DELAY_MS: u64 = 2000;

/// Archive the contents of a reddit subreddit.
#[derive(Parser, Debug)]
#[command(name = "archiver", author, version, about, long_about = None)]
pub struct Cli {
    /// The subreddit name
    pub subreddit: String,

    /// Logging level
    #[arg(long = "log", value_enum, ignore_case = true, default_value_t = LogLevel::Error)]
    pub log_level: LogLevel,

    /// Destination directory for the output
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Don't archive the contents of the subreddit's wiki
    #[arg(long)]
    pub no_wiki: bool,

    /// Don't archive revisions of the subreddit's wiki pages
    #[arg(long)]
    pub no_wiki_revisions: bool,

    /// Don't archive the subreddit's submissions
    #[arg(long)]
    pub no_submissions: bool,

    /// Don't compress the output
    #[arg(long)]
    pub no_compress: bool,

    /// Keep the raw directory after compressing
    #[arg(long)]
    pub keep: bool,

    /// The max number of submissions to archive
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Pause between wiki revision downloads, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REVISION_DELAY_MS)]
    pub revision_delay_ms: u64,

    /// JSON object stored as `extra_data` in archiveData.json
    #[arg(long, env = "ARCHIVER_META_EXTRA")]
    pub meta_extra: Option<String>,

    /// Reddit application client id
    #[arg(long, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Reddit application client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// User agent sent with every API request
    #[arg(long, env = "REDDIT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Critical => log::LevelFilter::Error,
        }
    }
}

/// Everything a run needs to know, resolved once from the command line.
/// This is what `archiveData.json` records as the invoking arguments, so it
/// never holds credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub subreddit: String,
    pub output_dir: PathBuf,
    pub wiki: bool,
    pub wiki_revisions: bool,
    pub submissions: bool,
    pub compress: bool,
    pub keep: bool,
    pub limit: usize,
    pub log_level: LogLevel,
    #[serde(with = "duration_millis")]
    pub revision_delay: Duration,
    /// Recorded separately as `extra_data`.
    #[serde(skip)]
    pub meta_extra: Option<Value>,
}

impl RunConfig {
    /// Defaults for everything but the subreddit name.
    pub fn new(subreddit: impl Into<String>) -> RunConfig {
        RunConfig {
            subreddit: subreddit.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            wiki: true,
            wiki_revisions: true,
            submissions: true,
            compress: true,
            keep: false,
            limit: DEFAULT_LIMIT,
            log_level: LogLevel::Error,
            revision_delay: Duration::from_millis(DEFAULT_REVISION_DELAY_MS),
            meta_extra: None,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

impl Cli {
    /// Validates the parsed arguments into a [`RunConfig`].
    pub fn resolve(&self) -> ArchiveResult<RunConfig> {
        let subreddit = self.subreddit.trim().trim_start_matches("r/").to_string();
        if subreddit.is_empty() || subreddit.contains(['/', '\\']) || subreddit.starts_with('.') {
            return Err(ArchiveError::Configuration(format!(
                "Invalid subreddit name: {}",
                self.subreddit
            )));
        }

        let meta_extra = match &self.meta_extra {
            Some(raw) => {
                let value: Value = serde_json::from_str(raw).map_err(|e| {
                    ArchiveError::Configuration(format!("--meta-extra is not valid JSON: {}", e))
                })?;
                if !value.is_object() {
                    return Err(ArchiveError::Configuration(
                        "--meta-extra must be a JSON object".to_string(),
                    ));
                }
                Some(value)
            }
            None => None,
        };

        Ok(RunConfig {
            subreddit,
            output_dir: self.output_dir.clone(),
            wiki: !self.no_wiki,
            wiki_revisions: !self.no_wiki_revisions,
            submissions: !self.no_submissions,
            compress: !self.no_compress,
            keep: self.keep,
            limit: self.limit,
            log_level: self.log_level,
            revision_delay: Duration::from_millis(self.revision_delay_ms),
            meta_extra,
        })
    }

    pub fn credentials(&self) -> ArchiveResult<Credentials> {
        let client_id = self.client_id.clone().filter(|id| !id.is_empty()).ok_or_else(|| {
            ArchiveError::Configuration("missing client id (set REDDIT_CLIENT_ID)".to_string())
        })?;
        let client_secret = self
            .client_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                ArchiveError::Configuration(
                    "missing client secret (set REDDIT_CLIENT_SECRET)".to_string(),
                )
            })?;

        Ok(Credentials {
            client_id,
            client_secret,
            user_agent: self.user_agent.clone(),
        })
    }
}

/// Sets up `env_logger` at the requested level. `RUST_LOG` still wins when
/// it is set.
pub fn init_logging(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();
}
