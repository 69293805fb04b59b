use std::collections::HashSet;

use serde_json::{json, Value};

use super::fake::FakeCommunity;
use super::fixtures::load_json_array;
use crate::comments::CommentForest;

fn ids(list: &[Value]) -> Vec<&str> {
    list.iter().map(|c| c["id"].as_str().unwrap()).collect()
}

#[test]
fn test_initial_tree_queues_placeholders() {
    let forest = CommentForest::from_things(&load_json_array("comments_abc123"));

    // c1, c2, c3 are real comments; c4, the c3 thread and c5/c6 are hidden.
    assert_eq!(forest.len(), 3);
    assert_eq!(forest.pending(), 3);
}

#[test]
fn test_expansion_is_exhaustive() {
    let fake = FakeCommunity::from_fixtures();
    let mut forest = CommentForest::from_things(&load_json_array("comments_abc123"));

    forest.expand(&fake, "abc123").unwrap();
    assert_eq!(forest.pending(), 0);

    let list = forest.into_list();
    assert_eq!(ids(&list), vec!["c1", "c3", "c5", "c2", "c4", "c7", "c6"]);

    let unique: HashSet<&str> = ids(&list).into_iter().collect();
    assert_eq!(unique.len(), list.len());

    assert_eq!(fake.calls_matching("more:t3_abc123:c4"), 1);
    assert_eq!(fake.calls_matching("more:t3_abc123:c5,c6"), 1);
    assert_eq!(fake.calls_matching("thread:abc123:c3"), 1);
}

#[test]
fn test_listed_comments_have_no_replies() {
    let fake = FakeCommunity::from_fixtures();
    let mut forest = CommentForest::from_things(&load_json_array("comments_abc123"));
    forest.expand(&fake, "abc123").unwrap();

    for comment in forest.into_list() {
        assert!(comment.get("replies").is_none());
    }
}

#[test]
fn test_duplicates_are_ignored() {
    let comment = json!({
        "kind": "t1",
        "data": { "id": "x1", "name": "t1_x1", "parent_id": "t3_s", "replies": "" }
    });
    let forest = CommentForest::from_things(&[comment.clone(), comment]);
    assert_eq!(forest.len(), 1);
}

#[test]
fn test_placeholders_for_known_comments_are_not_fetched() {
    let fake = FakeCommunity::default();
    let things = vec![
        json!({ "kind": "t1", "data": { "id": "x1", "name": "t1_x1", "parent_id": "t3_s" } }),
        json!({ "kind": "more", "data": { "parent_id": "t3_s", "children": ["x1"] } }),
    ];

    let mut forest = CommentForest::from_things(&things);
    forest.expand(&fake, "s").unwrap();

    assert_eq!(fake.calls_matching("more:"), 0);
    assert_eq!(forest.into_list().len(), 1);
}

#[test]
fn test_unresolvable_placeholders_do_not_loop() {
    let mut fake = FakeCommunity::default();
    // Resolving "y1" hands back the same placeholder again.
    fake.more.insert(
        "y1".to_string(),
        json!({ "kind": "more", "data": { "parent_id": "t3_s", "children": ["y1"] } }),
    );
    let things = vec![json!({
        "kind": "more",
        "data": { "parent_id": "t3_s", "children": ["y1"] }
    })];

    let mut forest = CommentForest::from_things(&things);
    forest.expand(&fake, "s").unwrap();

    assert_eq!(fake.calls_matching("more:"), 1);
    assert!(forest.is_empty());
}

#[test]
fn test_empty_continued_thread() {
    let mut fake = FakeCommunity::from_fixtures();
    fake.threads.clear();
    let things = vec![
        json!({ "kind": "t1", "data": { "id": "z1", "name": "t1_z1", "parent_id": "t3_s" } }),
        json!({ "kind": "more", "data": { "parent_id": "t1_z1", "children": [] } }),
    ];

    // A thread that resolves to nothing is not an error.
    let mut forest = CommentForest::from_things(&things);
    forest.expand(&fake, "s").unwrap();
    assert_eq!(forest.into_list().len(), 1);
}
