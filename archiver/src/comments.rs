//! Exhaustive comment-tree expansion.
//!
//! A submission's comment tree comes back with `more` placeholders wherever
//! the API truncated it. [`CommentForest`] keeps every comment seen so far in
//! an arena keyed by fullname and resolves placeholders until none are
//! left. Comments are deduplicated by fullname, so overlapping responses
//! never produce a comment twice.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use serde_json::Value;

use crate::reddit::{ApiError, Community};

const COMMENT_KIND: &str = "t1";
const MORE_KIND: &str = "more";

#[derive(Debug)]
struct Node {
    data: Value,
    children: Vec<usize>,
}

/// A "load more comments" placeholder.
#[derive(Debug, Clone, PartialEq)]
struct More {
    parent_id: String,
    ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CommentForest {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    by_fullname: HashMap<String, usize>,
    pending: VecDeque<More>,
    requested: HashSet<String>,
    continued: HashSet<String>,
}

impl CommentForest {
    /// Builds the forest from the top-level things of a comment listing.
    pub fn from_things(things: &[Value]) -> CommentForest {
        let mut forest = CommentForest::default();
        for thing in things {
            forest.add_thing(thing);
        }
        forest
    }

    /// Number of placeholders still waiting to be resolved.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves every placeholder, including the ones that resolving
    /// uncovers. There is no depth or count limit.
    pub fn expand(&mut self, community: &dyn Community, submission_id: &str) -> Result<(), ApiError> {
        let link_fullname = format!("t3_{}", submission_id);

        while let Some(more) = self.pending.pop_front() {
            let things = if more.ids.is_empty() {
                // "continue this thread": the placeholder carries no ids,
                // the replies have to be read from the parent's own thread.
                let Some(comment_id) = more.parent_id.strip_prefix("t1_") else {
                    continue;
                };
                if !self.continued.insert(more.parent_id.clone()) {
                    continue;
                }
                debug!("Continuing thread below {}", more.parent_id);
                community.comment_thread(submission_id, comment_id)?
            } else {
                let ids: Vec<String> = more
                    .ids
                    .into_iter()
                    .filter(|id| !self.by_fullname.contains_key(&format!("t1_{}", id)))
                    .filter(|id| self.requested.insert(id.clone()))
                    .collect();
                if ids.is_empty() {
                    continue;
                }
                debug!("Loading {} more comments below {}", ids.len(), more.parent_id);
                community.more_children(&link_fullname, &ids)?
            };

            for thing in &things {
                self.add_thing(thing);
            }
        }

        Ok(())
    }

    /// Comment data in breadth-first order: every top-level comment, then
    /// their replies, level by level.
    pub fn into_list(self) -> Vec<Value> {
        let CommentForest { nodes, roots, .. } = self;
        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        let mut queue: VecDeque<usize> = roots.into_iter().collect();
        let mut list = Vec::with_capacity(slots.len());

        while let Some(index) = queue.pop_front() {
            if let Some(node) = slots[index].take() {
                queue.extend(node.children);
                list.push(node.data);
            }
        }

        list
    }

    fn add_thing(&mut self, thing: &Value) {
        let kind = thing.get("kind").and_then(Value::as_str).unwrap_or_default();
        let Some(data) = thing.get("data") else {
            return;
        };

        match kind {
            COMMENT_KIND => self.add_comment(data),
            MORE_KIND => self.add_more(data),
            _ => {}
        }
    }

    fn add_comment(&mut self, data: &Value) {
        let Some(fullname) = data.get("name").and_then(Value::as_str) else {
            return;
        };

        // A thread fetched to continue a conversation starts with a comment
        // we already hold; only its replies are new.
        if !self.by_fullname.contains_key(fullname) {
            let mut node_data = data.clone();
            if let Some(object) = node_data.as_object_mut() {
                object.remove("replies");
            }

            let index = self.nodes.len();
            self.nodes.push(Node {
                data: node_data,
                children: Vec::new(),
            });
            self.by_fullname.insert(fullname.to_string(), index);

            let parent = data
                .get("parent_id")
                .and_then(Value::as_str)
                .and_then(|parent_id| self.by_fullname.get(parent_id).copied());
            match parent {
                Some(parent) => self.nodes[parent].children.push(index),
                None => self.roots.push(index),
            }
        }

        if let Some(replies) = data.pointer("/replies/data/children").and_then(Value::as_array) {
            for reply in replies {
                self.add_thing(reply);
            }
        }
    }

    fn add_more(&mut self, data: &Value) {
        let parent_id = data
            .get("parent_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let ids = data
            .get("children")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        self.pending.push_back(More { parent_id, ids });
    }
}
