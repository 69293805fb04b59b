//! Access to the Reddit API.
//!
//! Everything the archivers need from the remote side goes through the
//! [`Community`] trait: one handle per subreddit, returning raw JSON `data`
//! objects exactly as the API sends them. [`client::RedditSubreddit`] is the
//! HTTP implementation; tests substitute an in-memory one.

pub mod client;
pub mod listing;
pub mod responses;

use serde_json::Value;
use thiserror::Error;

pub use client::{Credentials, RedditClient, RedditSubreddit, DEFAULT_USER_AGENT};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Current content of a wiki page, optionally pinned to a revision.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiPage {
    pub name: String,
    pub content_md: String,
    pub revision_id: Option<String>,
}

/// One entry of a wiki page's revision history.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiRevision {
    pub id: String,
    pub timestamp: Option<i64>,
}

/// A handle on a single subreddit.
pub trait Community {
    /// Subreddit name as the operator typed it.
    fn name(&self) -> &str;

    /// The `data` object of `/r/<name>/about`.
    fn about(&self) -> Result<Value, ApiError>;

    /// The rules document of `/r/<name>/about/rules`, verbatim.
    fn rules(&self) -> Result<Value, ApiError>;

    /// Up to `limit` submissions ranked top of all time.
    fn top_submissions(&self, limit: usize) -> Result<Vec<Value>, ApiError>;

    /// Top-level things (`t1` comments and `more` placeholders) of a
    /// submission's comment tree, replies nested as the API returns them.
    fn comments(&self, submission_id: &str) -> Result<Vec<Value>, ApiError>;

    /// Resolves a batch of placeholder ids into a flat list of things.
    fn more_children(&self, link_fullname: &str, ids: &[String]) -> Result<Vec<Value>, ApiError>;

    /// Top-level things of the thread rooted at `comment_id`; the first one
    /// is the comment itself with its replies nested.
    fn comment_thread(&self, submission_id: &str, comment_id: &str)
        -> Result<Vec<Value>, ApiError>;

    fn wiki_pages(&self) -> Result<Vec<String>, ApiError>;

    fn wiki_page(&self, page: &str, revision: Option<&str>) -> Result<WikiPage, ApiError>;

    /// Full revision history of a page, newest first.
    fn wiki_revisions(&self, page: &str) -> Result<Vec<WikiRevision>, ApiError>;
}
