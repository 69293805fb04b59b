//! Allow-list flattening of raw API objects into archive records.
//!
//! A schema is an ordered list of dotted accessor paths. Each path is looked
//! up in the source object; nested paths produce an underscore-joined key
//! (`author.name` becomes `author_name`). A path that does not resolve is
//! left out of the record. A field that resolves to `null` is kept.

use serde_json::{Map, Value};

pub const SUBMISSION_FIELDS: &[&str] = &[
    "id",
    "shortlink",
    "fullname",
    "approved_by",
    "archived",
    "author.name",
    "author_flair_text",
    "banned_by",
    "contest_mode",
    "created",
    "created_utc",
    "distinguished",
    "domain",
    "downs",
    "edited",
    "gilded",
    "hidden",
    "is_self",
    "likes",
    "locked",
    "media",
    "media_embed",
    "name",
    "num_comments",
    "num_reports",
    "over_18",
    "permalink",
    "quarantine",
    "removal_reason",
    "score",
    "secure_media",
    "secure_media_embed",
    "selftext",
    "selftext_html",
    "spoiler",
    "stickied",
    "subreddit_name_prefixed",
    "subreddit_type",
    "subreddit_id",
    "thumbnail",
    "title",
    "ups",
    "upvote_ratio",
    "url",
    "post_hint",
    "preview",
];

pub const COMMENT_FIELDS: &[&str] = &[
    "fullname",
    "is_root",
    "author.name",
    "submission.id",
    "body",
    "can_mod_post",
    "controversiality",
    "created",
    "created_utc",
    "depth",
    "downs",
    "edited",
    "gilded",
    "id",
    "is_submitter",
    "name",
    "no_follow",
    "num_reports",
    "parent_id",
    "score",
    "ups",
    "score_hidden",
    "stickied",
];

/// One output key and the path used to look it up.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub path: Vec<String>,
}

impl Field {
    pub fn parse(dotted: &str) -> Field {
        let path: Vec<String> = dotted.split('.').map(str::to_string).collect();
        Field {
            key: path.join("_"),
            path,
        }
    }

    /// Follows the path through nested objects.
    pub fn lookup<'a>(&self, source: &'a Value) -> Option<&'a Value> {
        self.path
            .iter()
            .try_fold(source, |current, segment| current.as_object()?.get(segment))
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(dotted_paths: &[&str]) -> Schema {
        Schema {
            fields: dotted_paths.iter().map(|path| Field::parse(path)).collect(),
        }
    }

    pub fn submission() -> Schema {
        Schema::new(SUBMISSION_FIELDS)
    }

    pub fn comment() -> Schema {
        Schema::new(COMMENT_FIELDS)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    /// Projects `source` through the schema, in schema order.
    pub fn flatten(&self, source: &Value) -> Map<String, Value> {
        let mut record = Map::new();
        for field in &self.fields {
            if let Some(value) = field.lookup(source) {
                record.insert(field.key.clone(), value.clone());
            }
        }
        record
    }
}
