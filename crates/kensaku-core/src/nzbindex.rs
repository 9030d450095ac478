pub mod enrich;
pub mod feed;
pub mod filter;
pub mod query;

use std::sync::Arc;

pub use enrich::{EnrichSkip, Enrichment};
pub use feed::{parse_feed, parse_feed_at};
pub use filter::passes_filter;
pub use query::build_query;

use crate::cache::MemoryCache;
use crate::config::ProviderConfig;
use crate::error::KensakuError;
use crate::models::{MediaQuery, QualityConstraint, SearchMode, SearchResult};
use crate::traits::{Cache, Fetch, PlainTitleResolver, SearchProvider, TitleResolver};
use crate::transport::HttpFetcher;

/// NZBIndex over HTTP, with the NFO cache sharing the feed's throttle.
pub type HttpNzbIndex<R = PlainTitleResolver> =
    NzbIndex<Arc<HttpFetcher>, MemoryCache<Arc<HttpFetcher>>, R>;

/// The NZBIndex RSS search provider.
///
/// One instance serves movie, season and episode searches; only the query
/// phrasing differs between them, everything downstream of the feed is shared.
pub struct NzbIndex<F, C, R = PlainTitleResolver> {
    config: ProviderConfig,
    fetcher: F,
    cache: C,
    resolver: R,
}

impl HttpNzbIndex {
    /// Build a provider that talks to NZBIndex directly.
    pub fn from_config(config: ProviderConfig) -> Result<Self, KensakuError> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        let cache = MemoryCache::new(Arc::clone(&fetcher));
        Ok(NzbIndex::new(config, fetcher, cache, PlainTitleResolver))
    }
}

impl<F, C, R> NzbIndex<F, C, R>
where
    F: Fetch,
    C: Cache,
    R: TitleResolver,
{
    pub fn new(config: ProviderConfig, fetcher: F, cache: C, resolver: R) -> Self {
        Self {
            config,
            fetcher,
            cache,
            resolver,
        }
    }

    /// Media kinds this provider can search for.
    pub fn supported_modes() -> &'static [SearchMode] {
        SearchMode::ALL
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Full feed URL for a search.
    pub fn search_url(
        &self,
        media: &MediaQuery,
        quality: &QualityConstraint,
    ) -> Result<String, KensakuError> {
        let query = build_query(media, quality, &self.config, &self.resolver)?;
        let sep = if self.config.search_url.contains('?') {
            '&'
        } else {
            '?'
        };
        Ok(format!("{}{sep}{query}", self.config.search_url))
    }

    /// Search, then drop releases the filter rejects.
    ///
    /// The filter sees the feed description, so callers enrich only what
    /// survives.
    pub async fn search_and_filter(
        &self,
        media: &MediaQuery,
        quality: &QualityConstraint,
    ) -> Result<Vec<SearchResult>, KensakuError> {
        let mut results = self.search(media, quality).await?;
        results.retain(passes_filter);
        Ok(results)
    }
}

impl<F, C, R> SearchProvider for NzbIndex<F, C, R>
where
    F: Fetch,
    C: Cache,
    R: TitleResolver,
{
    async fn search(
        &self,
        media: &MediaQuery,
        quality: &QualityConstraint,
    ) -> Result<Vec<SearchResult>, KensakuError> {
        let url = self.search_url(media, quality)?;
        tracing::debug!(mode = %media.mode, %url, "searching NZBIndex");

        let bytes = self.fetcher.fetch(&url).await?;
        parse_feed(&bytes)
    }

    async fn enrich(&self, result: &mut SearchResult) -> Enrichment {
        enrich::enrich(result, &self.cache, self.config.nfo_cache_ttl()).await
    }

    fn passes_filter(&self, result: &SearchResult) -> bool {
        passes_filter(result)
    }
}
