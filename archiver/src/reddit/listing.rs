use serde::Deserialize;
use serde_json::Value;

/// Largest page size the listing endpoints accept.
pub const MAX_PAGE_SIZE: usize = 100;

/// A `kind: Listing` envelope. Most listings hold [`Thing`]s; the wiki
/// revision listing holds bare objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Listing<T = Thing> {
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
    #[serde(default)]
    pub after: Option<String>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing {
            children: Vec::new(),
            after: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    data: Listing<T>,
}

impl<T: for<'de> Deserialize<'de>> Listing<T> {
    /// Parses a full `{ "kind": "Listing", "data": { ... } }` document.
    pub fn from_value(value: Value) -> Result<Listing<T>, serde_json::Error> {
        let envelope: Envelope<T> = serde_json::from_value(value)?;
        Ok(envelope.data)
    }
}

impl Listing<Thing> {
    /// The children as `{kind, data}` objects.
    pub fn into_things(self) -> Vec<Value> {
        self.children
            .into_iter()
            .map(|thing| serde_json::json!({ "kind": thing.kind, "data": thing.data }))
            .collect()
    }
}

/// Follows `after` cursors until `limit` items were collected or the
/// listing is exhausted. `fetch` receives the cursor and the page size to
/// request. With no limit the listing is read to the end.
pub fn collect_pages<T, E, F>(limit: Option<usize>, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<&str>, usize) -> Result<Listing<T>, E>,
{
    let mut collected: Vec<T> = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let wanted = match limit {
            Some(limit) => limit.saturating_sub(collected.len()),
            None => MAX_PAGE_SIZE,
        };
        if wanted == 0 {
            break;
        }

        let page_size = wanted.min(MAX_PAGE_SIZE);
        let page = fetch(after.as_deref(), page_size)?;
        let received = page.children.len();
        collected.extend(page.children.into_iter().take(wanted));

        match page.after {
            Some(cursor) if received > 0 => after = Some(cursor),
            _ => break,
        }
    }

    Ok(collected)
}
