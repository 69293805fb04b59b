pub mod cli;
pub mod comments;
pub mod community;
pub mod compress;
pub mod error;
pub mod flatten;
pub mod io;
pub mod layout;
pub mod metadata;
pub mod reddit;
pub mod run;
pub mod submissions;
pub mod things;
pub mod wiki;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::cli::{init_logging, Cli, LogLevel, RunConfig};
pub use crate::error::{ArchiveError, ArchiveResult};
pub use crate::reddit::{Community, Credentials, RedditClient};
pub use crate::run::{now, run, RunContext, RunSummary};
