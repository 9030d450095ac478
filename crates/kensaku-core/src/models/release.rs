use serde::{Deserialize, Serialize};

/// A single release parsed from an NZBIndex feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider-local release id, taken from the detail link.
    pub id: u64,
    /// Raw release name from the feed.
    pub name: String,
    pub age_days: u32,
    pub size_mb: u64,
    /// `.nzb` download URL (the enclosure).
    pub download_url: String,
    pub detail_url: String,
    /// Feed description HTML, or the NFO text once enriched.
    pub description: String,
}
