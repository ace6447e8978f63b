use std::time::Duration;

use url::Url;

/// Connection settings for the memory service.
#[derive(Debug, Clone)]
pub struct MemoryServiceConfig {
    /// Service base URL, e.g. `http://localhost:8000`.
    pub base_url: Url,
    /// Per-request timeout. Memorize runs LLM-backed ingestion server-side,
    /// so this is deliberately generous.
    pub request_timeout: Duration,
}

impl MemoryServiceConfig {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            request_timeout: Duration::from_secs(120),
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
