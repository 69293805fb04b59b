use serde_json::json;

use super::fixtures::load_json_array;
use crate::flatten::{Field, Schema, COMMENT_FIELDS, SUBMISSION_FIELDS};
use crate::things::{hydrate_comment, hydrate_submission};

#[test]
fn test_field_keys() {
    assert_eq!(Field::parse("score").key, "score");
    assert_eq!(Field::parse("author.name").key, "author_name");
    assert_eq!(Field::parse("a.b.c").key, "a_b_c");
    assert_eq!(Field::parse("a.b.c").path, vec!["a", "b", "c"]);
}

#[test]
fn test_lookup_follows_nested_paths() {
    let source = json!({ "a": { "b": { "c": 3 } }, "flat": null });

    assert_eq!(Field::parse("a.b.c").lookup(&source), Some(&json!(3)));
    assert_eq!(Field::parse("flat").lookup(&source), Some(&json!(null)));
    assert_eq!(Field::parse("a.missing").lookup(&source), None);
    // A null parent has no children.
    assert_eq!(Field::parse("flat.child").lookup(&source), None);
}

#[test]
fn test_flatten_keeps_schema_order_and_skips_missing() {
    let schema = Schema::new(&["title", "author.name", "missing", "score"]);
    let record = schema.flatten(&json!({
        "score": 3,
        "author": { "name": "alice" },
        "title": "Hello",
        "extra": true,
    }));

    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "author_name", "score"]);
}

#[test]
fn test_submission_record_only_holds_allow_listed_keys() {
    let schema = Schema::submission();
    let allowed: Vec<&str> = schema.keys().collect();

    for raw in load_json_array("top_submissions") {
        let record = schema.flatten(&hydrate_submission(&raw));
        for key in record.keys() {
            assert!(allowed.contains(&key.as_str()), "unexpected key {}", key);
        }
        assert!(!record.contains_key("title_extra"));
        assert!(!record.contains_key("link_flair_text"));
    }
}

#[test]
fn test_submission_derived_attributes() {
    let submissions = load_json_array("top_submissions");
    let schema = Schema::submission();

    let first = schema.flatten(&hydrate_submission(&submissions[0]));
    assert_eq!(first["id"], "abc123");
    assert_eq!(first["fullname"], "t3_abc123");
    assert_eq!(first["shortlink"], "https://redd.it/abc123");
    assert_eq!(first["author_name"], "alice");
    // Present but null is archived as null.
    assert!(first.contains_key("approved_by"));
    assert!(first["approved_by"].is_null());
    // Absent fields are left out.
    assert!(!first.contains_key("post_hint"));
    assert!(!first.contains_key("preview"));

    let second = schema.flatten(&hydrate_submission(&submissions[1]));
    assert!(!second.contains_key("author_name"));
    assert_eq!(second["post_hint"], "image");
    assert!(second["preview"]["images"].is_array());
}

#[test]
fn test_comment_derived_attributes() {
    let schema = Schema::comment();
    let raw = json!({
        "id": "c9",
        "name": "t1_c9",
        "parent_id": "t1_c1",
        "link_id": "t3_abc123",
        "author": "zoe",
        "body": "text",
        "depth": 1,
        "replies": "",
        "subreddit": "test",
    });

    let record = schema.flatten(&hydrate_comment(&raw));
    assert_eq!(record["fullname"], "t1_c9");
    assert_eq!(record["is_root"], false);
    assert_eq!(record["author_name"], "zoe");
    assert_eq!(record["submission_id"], "abc123");
    assert_eq!(record["depth"], 1);
    assert!(!record.contains_key("replies"));
    assert!(!record.contains_key("subreddit"));

    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    let allowed: Vec<&str> = schema.keys().collect();
    assert!(keys.iter().all(|key| allowed.contains(key)));
}

#[test]
fn test_root_comment() {
    let record = Schema::comment().flatten(&hydrate_comment(&json!({
        "name": "t1_c1",
        "parent_id": "t3_abc123",
        "author": "[deleted]",
    })));
    assert_eq!(record["is_root"], true);
    assert!(!record.contains_key("author_name"));
}

#[test]
fn test_allow_lists_have_no_duplicates() {
    for fields in [SUBMISSION_FIELDS, COMMENT_FIELDS] {
        let mut sorted = fields.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), fields.len());
    }
}
