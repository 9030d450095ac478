//! Collaborator and provider interfaces.
//!
//! The NZBIndex provider is written against these traits so the transport,
//! cache and title-resolution layers can be swapped (or stubbed in tests)
//! without touching the feed logic.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::KensakuError;
use crate::models::{MediaQuery, QualityConstraint, SearchResult};
use crate::nzbindex::Enrichment;

/// Blocking-free byte fetch over some transport.
///
/// Implementations own rate limiting; callers simply await.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, KensakuError>> + Send;
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, KensakuError>> + Send {
        (**self).fetch(url)
    }
}

/// Read-through cache in front of a fetch.
pub trait Cache: Send + Sync {
    /// Return the cached body for `key`, fetching `url` on a miss or when
    /// the entry is older than `ttl`.
    fn get_or_fetch(
        &self,
        key: &str,
        url: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, KensakuError>> + Send;
}

/// Produces the canonical title used in search phrases.
pub trait TitleResolver: Send + Sync {
    /// Returns `None` when no usable title can be produced.
    fn resolve_search_title(&self, media: &MediaQuery, include_identifier: bool)
        -> Option<String>;
}

/// Uses the query title as-is, appending the identifier token when asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTitleResolver;

impl TitleResolver for PlainTitleResolver {
    fn resolve_search_title(
        &self,
        media: &MediaQuery,
        include_identifier: bool,
    ) -> Option<String> {
        let title = media.title.trim();
        if title.is_empty() {
            return None;
        }

        match media.identifier.as_deref().map(str::trim) {
            Some(id) if include_identifier && !id.is_empty() => Some(format!("{title} {id}")),
            _ => Some(title.to_string()),
        }
    }
}

/// A unified release search interface.
///
/// One implementation per indexer; the ranking pipeline only sees this.
pub trait SearchProvider: Send + Sync {
    /// Search the indexer and return every well-formed release, in feed order.
    fn search(
        &self,
        media: &MediaQuery,
        quality: &QualityConstraint,
    ) -> impl Future<Output = Result<Vec<SearchResult>, KensakuError>> + Send;

    /// Best-effort description enrichment for a release the caller selected.
    fn enrich(&self, result: &mut SearchResult) -> impl Future<Output = Enrichment> + Send;

    /// Provider-specific rejection heuristic.
    fn passes_filter(&self, result: &SearchResult) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title_without_identifier() {
        let media = MediaQuery::episode("Show Name", "S01E02");
        assert_eq!(
            PlainTitleResolver.resolve_search_title(&media, false).as_deref(),
            Some("Show Name")
        );
    }

    #[test]
    fn plain_title_with_identifier() {
        let media = MediaQuery::episode("  Show Name ", "S01E02");
        assert_eq!(
            PlainTitleResolver.resolve_search_title(&media, true).as_deref(),
            Some("Show Name S01E02")
        );
    }

    #[test]
    fn plain_title_rejects_blank() {
        let media = MediaQuery::movie("   ", 2020);
        assert_eq!(PlainTitleResolver.resolve_search_title(&media, false), None);
    }
}
