//! Shapes of the API responses the archivers read.
//!
//! Each function takes a decoded JSON body and pulls out the part the
//! [`Community`](super::Community) methods return. `path` is the endpoint the
//! body came from and only feeds error messages.

use serde_json::Value;

use super::client::API_BASE;
use super::listing::{Listing, Thing};
use super::{ApiError, WikiPage, WikiRevision};

pub(crate) fn malformed(path: &str, reason: impl ToString) -> ApiError {
    ApiError::Malformed {
        url: format!("{}{}", API_BASE, path),
        reason: reason.to_string(),
    }
}

/// The `data` object of `/r/<name>/about`.
pub fn about_data(path: &str, mut value: Value) -> Result<Value, ApiError> {
    match value.get_mut("data") {
        Some(data) if data.is_object() => Ok(data.take()),
        _ => Err(malformed(path, "missing data object")),
    }
}

/// Submission `data` objects out of listing children. Anything that is not
/// a `t3` is dropped.
pub fn submissions(things: Vec<Thing>) -> Vec<Value> {
    things
        .into_iter()
        .filter(|thing| thing.kind == "t3")
        .map(|thing| thing.data)
        .collect()
}

/// `/comments/...` answers with `[submission listing, comment listing]`;
/// only the second one holds comments.
pub fn comment_listing(path: &str, value: Value) -> Result<Vec<Value>, ApiError> {
    let mut parts = match value {
        Value::Array(parts) if parts.len() == 2 => parts,
        _ => return Err(malformed(path, "expected a two element array")),
    };
    let comments: Listing<Thing> =
        Listing::from_value(parts.remove(1)).map_err(|e| malformed(path, e))?;
    Ok(comments.into_things())
}

/// Things of one `/api/morechildren` batch, under `json.data.things`.
pub fn more_children(path: &str, mut value: Value) -> Result<Vec<Value>, ApiError> {
    match value.pointer_mut("/json/data/things") {
        Some(Value::Array(things)) => Ok(std::mem::take(things)),
        _ => Err(malformed(path, "missing json.data.things")),
    }
}

/// `/wiki/pages` lists page names as a bare string array under `data`.
pub fn wiki_page_names(path: &str, value: &Value) -> Result<Vec<String>, ApiError> {
    let pages = value
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(path, "missing page list"))?;

    Ok(pages
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

pub fn wiki_page(path: &str, name: &str, value: &Value) -> Result<WikiPage, ApiError> {
    let data = value
        .get("data")
        .ok_or_else(|| malformed(path, "missing data object"))?;
    let content_md = data
        .get("content_md")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(path, "missing content_md"))?;

    Ok(WikiPage {
        name: name.to_string(),
        content_md: content_md.to_string(),
        revision_id: data
            .get("revision_id")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// Revision entries are bare objects; `timestamp` comes as float seconds.
pub fn wiki_revisions(path: &str, entries: &[Value]) -> Result<Vec<WikiRevision>, ApiError> {
    entries
        .iter()
        .map(|entry| {
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(path, "revision without id"))?;
            Ok(WikiRevision {
                id: id.to_string(),
                timestamp: entry.get("timestamp").and_then(Value::as_f64).map(|t| t as i64),
            })
        })
        .collect()
}
