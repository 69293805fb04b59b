use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::Value;

use super::fixtures::{load_json_array, load_json_fixture};
use crate::reddit::{ApiError, Community, WikiPage, WikiRevision};

#[derive(Debug, Clone, Default)]
pub struct FakeWikiPage {
    pub content: String,
    /// (revision id, content at that revision), newest first
    pub revisions: Vec<(String, String)>,
}

/// An in-memory subreddit. Every call is recorded in `calls`.
#[derive(Debug, Default)]
pub struct FakeCommunity {
    pub name: String,
    pub about: Value,
    pub rules: Value,
    pub submissions: Vec<Value>,
    pub comments: HashMap<String, Vec<Value>>,
    pub more: HashMap<String, Value>,
    pub threads: HashMap<String, Vec<Value>>,
    pub wiki: BTreeMap<String, FakeWikiPage>,
    pub failing_comments: HashSet<String>,
    pub failing_wiki_pages: HashSet<String>,
    pub failing_revisions: HashSet<String>,
    pub fail_rules: bool,
    pub calls: RefCell<Vec<String>>,
}

fn fake_error(what: &str) -> ApiError {
    ApiError::Status {
        url: format!("https://oauth.reddit.com/{}", what),
        status: 500,
    }
}

impl FakeCommunity {
    /// The "test" subreddit from the fixtures: two submissions, no wiki.
    pub fn from_fixtures() -> FakeCommunity {
        let mut fake = FakeCommunity {
            name: "test".to_string(),
            about: load_json_fixture("about"),
            rules: load_json_fixture("rules"),
            submissions: load_json_array("top_submissions"),
            ..FakeCommunity::default()
        };
        fake.comments
            .insert("abc123".to_string(), load_json_array("comments_abc123"));
        fake.comments
            .insert("def456".to_string(), load_json_array("comments_def456"));
        for thing in load_json_array("more_children") {
            let id = thing["data"]["id"].as_str().unwrap().to_string();
            fake.more.insert(id, thing);
        }
        fake.threads
            .insert("c3".to_string(), load_json_array("thread_c3"));
        fake
    }

    pub fn with_wiki_page(mut self, name: &str, content: &str, revisions: &[(&str, &str)]) -> Self {
        self.wiki.insert(
            name.to_string(),
            FakeWikiPage {
                content: content.to_string(),
                revisions: revisions
                    .iter()
                    .map(|(id, content)| (id.to_string(), content.to_string()))
                    .collect(),
            },
        );
        self
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Community for FakeCommunity {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> Result<Value, ApiError> {
        self.record("about".to_string());
        Ok(self.about.clone())
    }

    fn rules(&self) -> Result<Value, ApiError> {
        self.record("rules".to_string());
        if self.fail_rules {
            return Err(fake_error("about/rules"));
        }
        Ok(self.rules.clone())
    }

    fn top_submissions(&self, limit: usize) -> Result<Vec<Value>, ApiError> {
        self.record(format!("top:{}", limit));
        Ok(self.submissions.iter().take(limit).cloned().collect())
    }

    fn comments(&self, submission_id: &str) -> Result<Vec<Value>, ApiError> {
        self.record(format!("comments:{}", submission_id));
        if self.failing_comments.contains(submission_id) {
            return Err(fake_error(&format!("comments/{}", submission_id)));
        }
        Ok(self.comments.get(submission_id).cloned().unwrap_or_default())
    }

    fn more_children(&self, link_fullname: &str, ids: &[String]) -> Result<Vec<Value>, ApiError> {
        self.record(format!("more:{}:{}", link_fullname, ids.join(",")));
        Ok(ids.iter().filter_map(|id| self.more.get(id).cloned()).collect())
    }

    fn comment_thread(&self, submission_id: &str, comment_id: &str) -> Result<Vec<Value>, ApiError> {
        self.record(format!("thread:{}:{}", submission_id, comment_id));
        Ok(self.threads.get(comment_id).cloned().unwrap_or_default())
    }

    fn wiki_pages(&self) -> Result<Vec<String>, ApiError> {
        self.record("wiki_pages".to_string());
        Ok(self.wiki.keys().cloned().collect())
    }

    fn wiki_page(&self, page: &str, revision: Option<&str>) -> Result<WikiPage, ApiError> {
        self.record(format!("wiki_page:{}:{}", page, revision.unwrap_or("current")));
        if revision.is_none() && self.failing_wiki_pages.contains(page) {
            return Err(fake_error(&format!("wiki/{}", page)));
        }
        if let Some(id) = revision {
            if self.failing_revisions.contains(id) {
                return Err(fake_error(&format!("wiki/{}?v={}", page, id)));
            }
        }

        let entry = self.wiki.get(page).ok_or_else(|| fake_error(page))?;
        let content = match revision {
            None => entry.content.clone(),
            Some(id) => entry
                .revisions
                .iter()
                .find(|(rev, _)| rev == id)
                .map(|(_, content)| content.clone())
                .ok_or_else(|| fake_error(id))?,
        };

        Ok(WikiPage {
            name: page.to_string(),
            content_md: content,
            revision_id: revision.map(str::to_string),
        })
    }

    fn wiki_revisions(&self, page: &str) -> Result<Vec<WikiRevision>, ApiError> {
        self.record(format!("wiki_revisions:{}", page));
        let entry = self.wiki.get(page).ok_or_else(|| fake_error(page))?;
        Ok(entry
            .revisions
            .iter()
            .map(|(id, _)| WikiRevision {
                id: id.clone(),
                timestamp: None,
            })
            .collect())
    }
}
