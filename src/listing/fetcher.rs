/// HTTP directory index retrieval
use super::ListingEntry;
use crate::config::HttpConfig;
use crate::error::{CatalogError, FetchError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static anchor selector"));

/// Source of directory listings.
///
/// Implementations return every `(link, display text)` pair of the listing at
/// `url`, with `../` and `./` already excluded.
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<ListingEntry>, FetchError>;
}

/// Fetches index pages over HTTP and extracts their anchors
#[derive(Clone)]
pub struct HttpDirectoryFetcher {
    client: Client,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpDirectoryFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, CatalogError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    async fn fetch_once(&self, url: &Url) -> Result<Vec<ListingEntry>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| self.classify_error(url, e))?;
        debug!("Downloaded {} characters of listing from {}", html.len(), url);

        Ok(parse_listing(&html))
    }

    /// Delay before retry number `attempt`, saturating on overflow
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff.checked_mul(attempt).unwrap_or(Duration::MAX)
    }

    fn classify_error(&self, url: &Url, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl DirectoryFetcher for HttpDirectoryFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<ListingEntry>, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(entries) => return Ok(entries),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!("Fetch of {} failed ({}), retry {}/{}", url, e, attempt, self.max_retries);
                    tokio::time::sleep(self.backoff(attempt)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Extract listing entries from an index page.
///
/// Every anchor with an `href` becomes one entry in document order. The
/// display text is the anchor's trimmed text content.
pub fn parse_listing(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let text = anchor.text().collect::<String>();
            Some(ListingEntry::new(href, text.trim()))
        })
        .filter(|entry| !entry.link.is_empty() && !entry.is_self_reference())
        .collect()
}
