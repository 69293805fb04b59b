use std::path::{Component, Path, PathBuf};
use std::thread;

use anyhow::{bail, Context, Result};
use log::{error, info};

use crate::io::write_with_parents;
use crate::reddit::Community;
use crate::run::RunContext;

/// `wiki/<page>.md`. Page names may contain `/`, which become
/// subdirectories; names that would leave the wiki directory are refused.
pub fn page_path(wiki_dir: &Path, page: &str) -> Result<PathBuf> {
    let relative = Path::new(page);
    let is_plain = !page.is_empty()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !is_plain {
        bail!("Refusing to write wiki page with unsafe name {:?}", page);
    }
    Ok(wiki_dir.join(format!("{}.md", page)))
}

/// `wiki/<page>.<revision>.md`
pub fn revision_path(wiki_dir: &Path, page: &str, revision: &str) -> Result<PathBuf> {
    if revision.is_empty() || revision.contains(['/', '\\']) || revision.contains("..") {
        bail!("Refusing to write wiki revision with unsafe id {:?}", revision);
    }
    page_path(wiki_dir, &format!("{}.{}", page, revision))
}

/// Archives every wiki page and, when enabled, every revision of it.
/// Failures are logged per page and per revision. Returns how many files
/// were written.
pub fn archive_wiki(community: &dyn Community, ctx: &mut RunContext) -> usize {
    let pages = match community.wiki_pages() {
        Ok(pages) => pages,
        Err(e) => {
            error!("Failed to list wiki pages of r/{}: {}", community.name(), e);
            ctx.failures.listings += 1;
            return 0;
        }
    };

    let mut written = 0;
    for page in &pages {
        info!("Processing Wiki Page: {}", page);

        if let Err(e) = archive_page(community, ctx, page) {
            error!("Ran into an error processing wiki page {}: {:#}", page, e);
            ctx.failures.wiki_pages += 1;
            continue;
        }
        written += 1;

        if ctx.config.wiki_revisions {
            written += archive_revisions(community, ctx, page);
        }
    }

    written
}

fn archive_page(community: &dyn Community, ctx: &RunContext, page: &str) -> Result<()> {
    let path = page_path(&ctx.layout.wiki, page)?;
    let current = community
        .wiki_page(page, None)
        .with_context(|| format!("Failed to fetch wiki page {}", page))?;
    write_with_parents(&path, current.content_md.as_bytes())
}

fn archive_revisions(community: &dyn Community, ctx: &mut RunContext, page: &str) -> usize {
    let revisions = match community.wiki_revisions(page) {
        Ok(revisions) => revisions,
        Err(e) => {
            error!("Failed to list revisions of wiki page {}: {}", page, e);
            ctx.failures.wiki_pages += 1;
            return 0;
        }
    };

    let mut written = 0;
    for revision in &revisions {
        info!("Processing Wiki Page: {} revision: {}", page, revision.id);

        let result = revision_path(&ctx.layout.wiki, page, &revision.id).and_then(|path| {
            let content = community
                .wiki_page(page, Some(&revision.id))
                .with_context(|| format!("Failed to fetch revision {} of {}", revision.id, page))?;
            write_with_parents(&path, content.content_md.as_bytes())
        });

        match result {
            Ok(()) => written += 1,
            Err(e) => {
                error!(
                    "Ran into an error processing wiki page {} revision {}: {:#}",
                    page, revision.id, e
                );
                ctx.failures.wiki_revisions += 1;
            }
        }

        if !ctx.config.revision_delay.is_zero() {
            thread::sleep(ctx.config.revision_delay);
        }
    }

    written
}
