//! NZBIndex search provider.
//!
//! Turns a media query into an NZBIndex RSS search, parses the feed into
//! [`SearchResult`]s and offers best-effort NFO enrichment plus the
//! password-marker filter for the results a caller keeps.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod nzbindex;
pub mod traits;
pub mod transport;

pub use cache::MemoryCache;
pub use config::{AppConfig, ProviderConfig};
pub use error::{EntryError, KensakuError};
pub use models::{MediaQuery, QualityConstraint, SearchMode, SearchResult};
pub use nzbindex::{EnrichSkip, Enrichment, HttpNzbIndex, NzbIndex};
pub use traits::{Cache, Fetch, PlainTitleResolver, SearchProvider, TitleResolver};
pub use transport::{HttpFetcher, Throttle};
