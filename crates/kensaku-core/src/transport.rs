use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::ProviderConfig;
use crate::error::KensakuError;
use crate::traits::Fetch;

/// Spaces out calls so consecutive ones start at least `interval` apart.
///
/// Concurrent waiters are served one at a time, in lock order.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the next call is allowed, then claim the slot.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(prev) = *last_call {
            tokio::time::sleep_until(prev + self.interval).await;
        }
        *last_call = Some(Instant::now());
    }
}

/// `reqwest`-backed [`Fetch`] for NZBIndex, one request per interval.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    throttle: Throttle,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self, KensakuError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kensaku/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            throttle: Throttle::new(config.min_call_interval()),
            timeout: config.request_timeout(),
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, KensakuError> {
        self.throttle.wait().await;
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| KensakuError::Transport(format!("fetch {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url, "NZBIndex request failed");
            return Err(KensakuError::Transport(format!("HTTP {status} for {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| KensakuError::Transport(format!("read {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
