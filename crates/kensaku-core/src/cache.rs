use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::KensakuError;
use crate::traits::{Cache, Fetch};

struct CacheEntry {
    stored_at: Instant,
    body: Vec<u8>,
}

/// In-process read-through cache over a [`Fetch`].
///
/// Entries live until their TTL lapses; failed fetches are never stored.
pub struct MemoryCache<F> {
    fetcher: F,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl<F: Fetch> MemoryCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lookup(&self, key: &str, ttl: Duration) -> Option<Vec<u8>> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < ttl)
            .map(|e| e.body.clone())
    }

    /// Insert a fresh body, dropping every entry already older than `ttl`.
    fn store(&self, key: &str, body: &[u8], ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|_, e| e.stored_at.elapsed() < ttl);
            entries.insert(
                key.to_string(),
                CacheEntry {
                    stored_at: Instant::now(),
                    body: body.to_vec(),
                },
            );
        }
    }
}

impl<F: Fetch> Cache for MemoryCache<F> {
    async fn get_or_fetch(
        &self,
        key: &str,
        url: &str,
        ttl: Duration,
    ) -> Result<Vec<u8>, KensakuError> {
        if let Some(body) = self.lookup(key, ttl) {
            tracing::debug!(key, "cache hit");
            return Ok(body);
        }

        tracing::debug!(key, url, "cache miss");
        let body = self.fetcher.fetch(url).await?;
        self.store(key, &body, ttl);
        Ok(body)
    }
}
