use anyhow::{anyhow, Context, Result};
use log::{error, info};
use serde_json::{Map, Value};

use crate::comments::CommentForest;
use crate::flatten::Schema;
use crate::io::write_json;
use crate::reddit::Community;
use crate::run::RunContext;
use crate::things::{hydrate_comment, hydrate_submission};

/// Builds the archive record of one submission: its allow-listed fields
/// plus every comment of its fully expanded tree.
pub fn build_submission_record(
    community: &dyn Community,
    submission: &Value,
    submission_schema: &Schema,
    comment_schema: &Schema,
) -> Result<(String, Map<String, Value>)> {
    let id = submission
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Submission has no id"))?
        .to_string();

    let mut record = submission_schema.flatten(&hydrate_submission(submission));

    let things = community
        .comments(&id)
        .with_context(|| format!("Failed to fetch comments of {}", id))?;
    let mut forest = CommentForest::from_things(&things);
    forest
        .expand(community, &id)
        .with_context(|| format!("Failed to expand comments of {}", id))?;

    let comments: Vec<Value> = forest
        .into_list()
        .iter()
        .map(|comment| Value::Object(comment_schema.flatten(&hydrate_comment(comment))))
        .collect();
    record.insert("comments".to_string(), Value::Array(comments));

    Ok((id, record))
}

/// Archives the top submissions into `submissions/<id>.json`. A submission
/// that fails is logged and skipped. Returns how many were written.
pub fn archive_submissions(community: &dyn Community, ctx: &mut RunContext) -> usize {
    info!("Processing Submissions");

    let submissions = match community.top_submissions(ctx.config.limit) {
        Ok(submissions) => submissions,
        Err(e) => {
            error!("Failed to list submissions of r/{}: {}", community.name(), e);
            ctx.failures.listings += 1;
            return 0;
        }
    };

    let submission_schema = Schema::submission();
    let comment_schema = Schema::comment();
    let mut count = 0;

    for submission in &submissions {
        let label = submission
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        info!("Processing Submission: {}", label);

        let written = build_submission_record(community, submission, &submission_schema, &comment_schema)
            .and_then(|(id, record)| {
                write_json(ctx.layout.submission_file(&id), &record)?;
                Ok(id)
            });

        match written {
            Ok(id) => {
                println!("{}", id);
                count += 1;
            }
            Err(e) => {
                error!("Ran into an error processing submission {}: {:#}", label, e);
                ctx.failures.submissions += 1;
            }
        }
    }

    info!("Finished processing {} submissions", count);
    count
}
