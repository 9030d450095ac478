use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

use crate::models::SearchResult;
use crate::traits::Cache;

/// Descriptions that link an NFO contain this path fragment.
const NFO_MARKER: &str = "/nfo/";

static RE_NFO_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*"([^"]*/nfo/[^"]*)""#).unwrap());

static NFO_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre#nfo0").unwrap());

/// Outcome of an enrichment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The description now holds the NFO text.
    Applied,
    /// The description was left untouched.
    Skipped(EnrichSkip),
}

/// Why no NFO text was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichSkip {
    NoMarker,
    NoLink,
    Fetch(String),
    NoBlock,
}

impl std::fmt::Display for EnrichSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMarker => write!(f, "no NFO marker"),
            Self::NoLink => write!(f, "no NFO link"),
            Self::Fetch(e) => write!(f, "fetch failed: {e}"),
            Self::NoBlock => write!(f, "no nfo0 block"),
        }
    }
}

/// Replace the description with the linked NFO text, if there is one.
///
/// The NFO document is read through `cache` under `nzbindex.<id>`. Nothing
/// here fails: every problem leaves the description as it was.
pub async fn enrich(result: &mut SearchResult, cache: &impl Cache, ttl: Duration) -> Enrichment {
    match fetch_nfo_text(result, cache, ttl).await {
        Ok(text) => {
            tracing::debug!(id = result.id, "applied NFO description");
            result.description = text;
            Enrichment::Applied
        }
        Err(skip) => {
            tracing::debug!(id = result.id, reason = %skip, "NFO enrichment skipped");
            Enrichment::Skipped(skip)
        }
    }
}

async fn fetch_nfo_text(
    result: &SearchResult,
    cache: &impl Cache,
    ttl: Duration,
) -> Result<String, EnrichSkip> {
    if !result.description.to_lowercase().contains(NFO_MARKER) {
        return Err(EnrichSkip::NoMarker);
    }

    let nfo_url = nfo_link(result).ok_or(EnrichSkip::NoLink)?;
    let body = cache
        .get_or_fetch(&cache_key(result.id), &nfo_url, ttl)
        .await
        .map_err(|e| EnrichSkip::Fetch(e.to_string()))?;

    extract_nfo(&String::from_utf8_lossy(&body)).ok_or(EnrichSkip::NoBlock)
}

pub(crate) fn cache_key(id: u64) -> String {
    format!("nzbindex.{id}")
}

/// Absolute NFO URL from the description's `href`, resolved against the
/// release page when relative.
fn nfo_link(result: &SearchResult) -> Option<String> {
    let href = RE_NFO_HREF
        .captures(&result.description)?
        .get(1)?
        .as_str()
        .replace("&amp;", "&");

    url::Url::parse(&href)
        .or_else(|_| url::Url::parse(&result.detail_url).and_then(|base| base.join(&href)))
        .ok()
        .map(String::from)
}

/// Text of the `<pre id="nfo0">` block.
fn extract_nfo(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let text: String = document.select(&NFO_BLOCK).next()?.text().collect();
    (!text.trim().is_empty()).then_some(text)
}
