use log::info;
use serde_json::{json, Value};

use crate::error::{ArchiveError, ArchiveResult};
use crate::io::write_json;
use crate::layout::ArchiveLayout;
use crate::reddit::Community;

/// Writes `rules.json` and `<display_name>.json`. These describe the
/// subreddit itself, so any failure here aborts the run.
pub fn archive_community_info(community: &dyn Community, layout: &ArchiveLayout) -> ArchiveResult<()> {
    info!("Archiving information about r/{}", community.name());

    let rules = community
        .rules()
        .map_err(|source| ArchiveError::FoundationalFetch {
            what: "subreddit rules",
            source,
        })?;
    let rules_file = layout.rules_file();
    write_json(&rules_file, &rules).map_err(|e| ArchiveError::write(&rules_file, e))?;

    let about = community
        .about()
        .map_err(|source| ArchiveError::FoundationalFetch {
            what: "subreddit information",
            source,
        })?;

    let display_name = about
        .get("display_name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && !name.starts_with('.'))
        .unwrap_or_else(|| community.name())
        .to_string();
    let info = json!({
        "name": display_name,
        "description": about.get("description").cloned().unwrap_or(Value::Null),
        "title": about.get("title").cloned().unwrap_or(Value::Null),
    });

    let info_file = layout.info_file(&display_name);
    write_json(&info_file, &info).map_err(|e| ArchiveError::write(&info_file, e))?;

    Ok(())
}
