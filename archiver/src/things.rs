//! Derived attributes on raw submission and comment objects.
//!
//! The API sends `author` as a bare name and identifies a comment's
//! submission only through `link_id`. These helpers reshape the raw `data`
//! objects into the attribute layout the archive records are built from.

use serde_json::{json, Map, Value};

const DELETED_AUTHOR: &str = "[deleted]";
const SUBMISSION_PREFIX: &str = "t3_";

pub fn hydrate_submission(raw: &Value) -> Value {
    let mut data = as_object(raw);

    if let Some(name) = data.get("name").cloned() {
        data.insert("fullname".to_string(), name);
    }
    if let Some(id) = data.get("id").and_then(Value::as_str) {
        let shortlink = format!("https://redd.it/{}", id);
        data.insert("shortlink".to_string(), Value::String(shortlink));
    }
    wrap_author(&mut data);

    Value::Object(data)
}

pub fn hydrate_comment(raw: &Value) -> Value {
    let mut data = as_object(raw);
    data.remove("replies");

    if let Some(name) = data.get("name").cloned() {
        data.insert("fullname".to_string(), name);
    }
    if let Some(parent_id) = data.get("parent_id").and_then(Value::as_str) {
        let is_root = parent_id.starts_with(SUBMISSION_PREFIX);
        data.insert("is_root".to_string(), Value::Bool(is_root));
    }
    if let Some(link_id) = data.get("link_id").and_then(Value::as_str) {
        let id = link_id.trim_start_matches(SUBMISSION_PREFIX).to_string();
        data.insert("submission".to_string(), json!({ "id": id }));
    }
    wrap_author(&mut data);

    Value::Object(data)
}

fn as_object(raw: &Value) -> Map<String, Value> {
    raw.as_object().cloned().unwrap_or_default()
}

/// `"author": "name"` becomes `"author": {"name": "name"}`; deleted
/// accounts have no author object at all.
fn wrap_author(data: &mut Map<String, Value>) {
    let author = match data.get("author") {
        Some(Value::String(name)) if name != DELETED_AUTHOR => json!({ "name": name }),
        Some(Value::Object(_)) => return,
        Some(_) => Value::Null,
        None => return,
    };
    data.insert("author".to_string(), author);
}
