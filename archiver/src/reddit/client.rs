use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::listing::{collect_pages, Listing, Thing};
use super::responses::{self, malformed};
use super::{ApiError, Community, WikiPage, WikiRevision};
use crate::error::{ArchiveError, ArchiveResult};

pub const DEFAULT_USER_AGENT: &str = "subreddit-archiver:v0.1 (github.com/chpwssn/subreddit-archiver)";

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub(crate) const API_BASE: &str = "https://oauth.reddit.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// `/api/morechildren` accepts at most this many ids per call.
const MORE_CHILDREN_BATCH: usize = 100;

/// Application credentials for the app-only OAuth flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// An authenticated, read-only session against `oauth.reddit.com`.
pub struct RedditClient {
    http: Client,
    token: String,
}

impl RedditClient {
    /// Runs the `client_credentials` grant. Rejected credentials surface as
    /// [`ArchiveError::Authentication`].
    pub fn connect(credentials: &Credentials) -> ArchiveResult<RedditClient> {
        let http = Client::builder()
            .user_agent(credentials.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ArchiveError::Authentication(format!("cannot build HTTP client: {}", e)))?;

        let response = http
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .map_err(|e| ArchiveError::Authentication(format!("token request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ArchiveError::Authentication(format!(
                "credentials rejected (HTTP {})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(ArchiveError::Authentication(format!(
                "token endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .map_err(|e| ArchiveError::Authentication(format!("unreadable token response: {}", e)))?;
        let token = match (body.access_token, body.error) {
            (Some(token), _) => token,
            (None, Some(error)) => return Err(ArchiveError::Authentication(error)),
            (None, None) => {
                return Err(ArchiveError::Authentication(
                    "token response has no access_token".to_string(),
                ))
            }
        };

        info!("Authenticated against the Reddit API");
        Ok(RedditClient { http, token })
    }

    pub fn subreddit(&self, name: &str) -> RedditSubreddit<'_> {
        RedditSubreddit {
            client: self,
            name: name.to_string(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", API_BASE, path))
            .bearer_auth(&self.token)
            .query(&[("raw_json", "1")])
    }

    fn fetch_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", API_BASE, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .get(path)
            .query(query)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .map_err(|source| ApiError::Transport { url, source })
    }
}

/// A [`Community`] backed by live API calls.
pub struct RedditSubreddit<'a> {
    client: &'a RedditClient,
    name: String,
}

impl RedditSubreddit<'_> {
    fn listing<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Listing<T>, ApiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self.client.fetch_json(path, query)?;
        Listing::from_value(value).map_err(|e| malformed(path, e))
    }

    fn comment_listing(&self, path: &str) -> Result<Vec<Value>, ApiError> {
        let value = self.client.fetch_json(path, &[])?;
        responses::comment_listing(path, value)
    }
}

impl Community for RedditSubreddit<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> Result<Value, ApiError> {
        let path = format!("/r/{}/about", self.name);
        let value = self.client.fetch_json(&path, &[])?;
        responses::about_data(&path, value)
    }

    fn rules(&self) -> Result<Value, ApiError> {
        self.client
            .fetch_json(&format!("/r/{}/about/rules", self.name), &[])
    }

    fn top_submissions(&self, limit: usize) -> Result<Vec<Value>, ApiError> {
        let path = format!("/r/{}/top", self.name);
        let things: Vec<Thing> = collect_pages(Some(limit), |after, page_size| {
            let mut query = vec![("t", "all".to_string()), ("limit", page_size.to_string())];
            if let Some(after) = after {
                query.push(("after", after.to_string()));
            }
            self.listing(&path, &query)
        })?;

        Ok(responses::submissions(things))
    }

    fn comments(&self, submission_id: &str) -> Result<Vec<Value>, ApiError> {
        self.comment_listing(&format!("/comments/{}", submission_id))
    }

    fn more_children(&self, link_fullname: &str, ids: &[String]) -> Result<Vec<Value>, ApiError> {
        let path = "/api/morechildren";
        let mut things = Vec::new();

        for batch in ids.chunks(MORE_CHILDREN_BATCH) {
            let query = [
                ("api_type", "json".to_string()),
                ("link_id", link_fullname.to_string()),
                ("children", batch.join(",")),
            ];
            let value = self.client.fetch_json(path, &query)?;
            things.extend(responses::more_children(path, value)?);
        }

        Ok(things)
    }

    fn comment_thread(
        &self,
        submission_id: &str,
        comment_id: &str,
    ) -> Result<Vec<Value>, ApiError> {
        self.comment_listing(&format!("/comments/{}/_/{}", submission_id, comment_id))
    }

    fn wiki_pages(&self) -> Result<Vec<String>, ApiError> {
        let path = format!("/r/{}/wiki/pages", self.name);
        let value = self.client.fetch_json(&path, &[])?;
        responses::wiki_page_names(&path, &value)
    }

    fn wiki_page(&self, page: &str, revision: Option<&str>) -> Result<WikiPage, ApiError> {
        let path = format!("/r/{}/wiki/{}", self.name, page);
        let query: Vec<(&str, String)> = revision
            .map(|id| vec![("v", id.to_string())])
            .unwrap_or_default();
        let value = self.client.fetch_json(&path, &query)?;
        responses::wiki_page(&path, page, &value)
    }

    fn wiki_revisions(&self, page: &str) -> Result<Vec<WikiRevision>, ApiError> {
        let path = format!("/r/{}/wiki/revisions/{}", self.name, page);
        let entries: Vec<Value> = collect_pages(None, |after, page_size| {
            let mut query = vec![("limit", page_size.to_string())];
            if let Some(after) = after {
                query.push(("after", after.to_string()));
            }
            self.listing(&path, &query)
        })?;

        responses::wiki_revisions(&path, &entries)
    }
}
