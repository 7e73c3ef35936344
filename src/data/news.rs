use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::retry::retry_with_backoff;
use super::{DataError, DataResult, Headline, Ticker};
use crate::config::NewsConfig;

/// Maximum number of headlines any source hands to the scorer
pub const DEFAULT_MAX_HEADLINES: usize = 5;

/// Source of recent headlines for a ticker, most recent first.
///
/// Implementations must not fail: any fetch, parse or timeout problem is
/// reported as an empty list.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Fetch at most the configured number of headlines for `ticker`
    async fn fetch(&self, ticker: &str) -> Vec<Headline>;
}

/// Headlines from a per-ticker RSS feed (Yahoo Finance by default)
pub struct RssHeadlineSource {
    http_client: reqwest::Client,
    feed_url: String,
    region: String,
    lang: String,
    max_headlines: usize,
    call_timeout: Duration,
    retry_attempts: usize,
}

impl RssHeadlineSource {
    pub fn new(config: &NewsConfig) -> DataResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("sentiment-overlay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Whole-call budget: one request timeout per attempt
        let attempts = config.retry_attempts as u64 + 1;
        let call_timeout = Duration::from_secs(config.timeout_seconds.saturating_mul(attempts));

        Ok(Self {
            http_client,
            feed_url: config.feed_url.clone(),
            region: config.region.clone(),
            lang: config.lang.clone(),
            max_headlines: config.max_headlines,
            call_timeout,
            retry_attempts: config.retry_attempts,
        })
    }

    /// Feed URL for a ticker, keyed by symbol, region and language
    pub fn feed_url(&self, ticker: &str) -> String {
        format!(
            "{}?s={}&region={}&lang={}",
            self.feed_url,
            urlencoding::encode(ticker),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.lang),
        )
    }

    async fn fetch_feed(&self, ticker: &str) -> DataResult<Vec<Headline>> {
        let url = self.feed_url(ticker);

        retry_with_backoff(|| async {
            let response = self.http_client
                .get(&url)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(DataError::api_error(
                    status.as_u16(),
                    format!("feed request for {} failed", ticker),
                ));
            }

            let body = response.bytes().await?;
            parse_feed_titles(&body, self.max_headlines)
        }, self.retry_attempts).await
    }
}

#[async_trait]
impl HeadlineSource for RssHeadlineSource {
    fn name(&self) -> &str {
        "rss"
    }

    async fn fetch(&self, ticker: &str) -> Vec<Headline> {
        match tokio::time::timeout(self.call_timeout, self.fetch_feed(ticker)).await {
            Ok(Ok(headlines)) => {
                tracing::debug!(ticker, count = headlines.len(), "Fetched headlines");
                headlines
            }
            Ok(Err(e)) => {
                tracing::warn!(ticker, "Headline fetch failed: {}, using no headlines", e);
                Vec::new()
            }
            Err(_) => {
                let timeout = DataError::Timeout {
                    timeout_seconds: self.call_timeout.as_secs(),
                };
                tracing::warn!(ticker, "Headline fetch failed: {}, using no headlines", timeout);
                Vec::new()
            }
        }
    }
}

/// Titles of the first `limit` entries of an RSS or Atom document.
/// Entries without a title are skipped.
pub fn parse_feed_titles(body: &[u8], limit: usize) -> DataResult<Vec<Headline>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| DataError::parse_error(e.to_string()))?;

    let titles = feed
        .entries
        .into_iter()
        .take(limit)
        .filter_map(|entry| entry.title)
        .map(|title| title.content.trim().to_string())
        .collect();

    Ok(titles)
}

/// In-memory headline source, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticHeadlineSource {
    headlines: HashMap<Ticker, Vec<Headline>>,
    max_headlines: usize,
}

impl StaticHeadlineSource {
    pub fn new(headlines: HashMap<Ticker, Vec<Headline>>) -> Self {
        Self {
            headlines,
            max_headlines: DEFAULT_MAX_HEADLINES,
        }
    }

    pub fn with_limit(mut self, max_headlines: usize) -> Self {
        self.max_headlines = max_headlines;
        self
    }
}

#[async_trait]
impl HeadlineSource for StaticHeadlineSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, ticker: &str) -> Vec<Headline> {
        self.headlines
            .get(ticker)
            .map(|items| items.iter().take(self.max_headlines).cloned().collect())
            .unwrap_or_default()
    }
}
