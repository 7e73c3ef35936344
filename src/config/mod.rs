use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::data::validation::normalize_universe;
use crate::data::Ticker;
use crate::overlay::Thresholds;

/// Default ticker universe
pub const DEFAULT_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA", "BRK-B", "JPM", "JNJ",
];

/// Run configuration. Built once per run and not mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub universe: Vec<Ticker>,
    pub output_dir: PathBuf,
    pub news: NewsConfig,
    pub factors: FactorConfig,
    pub thresholds: Thresholds,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    pub feed_url: String,
    pub region: String,
    pub lang: String,
    pub max_headlines: usize,
    pub timeout_seconds: u64,
    pub retry_attempts: usize,
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactorSource {
    /// Random exposures
    Mock,
    /// CSV export of a factor model
    File(PathBuf),
}

impl FromStr for FactorSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "mock" => FactorSource::Mock,
            path => FactorSource::File(PathBuf::from(path)),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorConfig {
    pub source: FactorSource,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub write_headlines: bool,
    pub write_plot: bool,
}

impl Config {
    /// Load from `.env` (if present) and the process environment
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an explicit env file, then the process environment.
    /// Variables already set in the environment win.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenv::from_path(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var_or = |key: &str, default: String| lookup(key).unwrap_or(default);

        let universe = match lookup("OVERLAY_TICKERS") {
            Some(list) => normalize_universe(list.split(','))
                .context("Invalid OVERLAY_TICKERS value")?,
            None => defaults.universe,
        };

        let config = Config {
            universe,
            output_dir: PathBuf::from(var_or(
                "OVERLAY_OUTPUT_DIR",
                defaults.output_dir.display().to_string(),
            )),
            news: NewsConfig {
                feed_url: var_or("NEWS_FEED_URL", defaults.news.feed_url),
                region: var_or("NEWS_REGION", defaults.news.region),
                lang: var_or("NEWS_LANG", defaults.news.lang),
                max_headlines: parse_var(&lookup, "NEWS_MAX_HEADLINES", defaults.news.max_headlines)?,
                timeout_seconds: parse_var(&lookup, "NEWS_TIMEOUT_SECONDS", defaults.news.timeout_seconds)?,
                retry_attempts: parse_var(&lookup, "NEWS_RETRY_ATTEMPTS", defaults.news.retry_attempts)?,
                max_concurrency: parse_var(&lookup, "NEWS_MAX_CONCURRENCY", defaults.news.max_concurrency)?,
            },
            factors: FactorConfig {
                source: parse_var(&lookup, "FACTOR_SOURCE", defaults.factors.source)?,
                seed: match lookup("FACTOR_SEED") {
                    Some(seed) => Some(seed.trim().parse().context("Invalid FACTOR_SEED value")?),
                    None => None,
                },
            },
            thresholds: Thresholds {
                negative_sentiment: parse_var(
                    &lookup,
                    "INSIGHT_NEGATIVE_SENTIMENT",
                    defaults.thresholds.negative_sentiment,
                )?,
                high_momentum: parse_var(&lookup, "INSIGHT_HIGH_MOMENTUM", defaults.thresholds.high_momentum)?,
                positive_sentiment: parse_var(
                    &lookup,
                    "INSIGHT_POSITIVE_SENTIMENT",
                    defaults.thresholds.positive_sentiment,
                )?,
                losing_momentum: parse_var(
                    &lookup,
                    "INSIGHT_LOSING_MOMENTUM",
                    defaults.thresholds.losing_momentum,
                )?,
            },
            report: ReportConfig {
                write_headlines: parse_var(&lookup, "OVERLAY_WRITE_HEADLINES", defaults.report.write_headlines)?,
                write_plot: parse_var(&lookup, "OVERLAY_WRITE_PLOT", defaults.report.write_plot)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.universe.is_empty() {
            bail!("Ticker universe is empty");
        }
        if self.news.max_headlines == 0 {
            bail!("NEWS_MAX_HEADLINES must be at least 1");
        }
        if self.news.max_concurrency == 0 {
            bail!("NEWS_MAX_CONCURRENCY must be at least 1");
        }
        if self.news.timeout_seconds == 0 {
            bail!("NEWS_TIMEOUT_SECONDS must be at least 1");
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feed_url: "https://feeds.finance.yahoo.com/rss/2.0/headline".to_string(),
            region: "US".to_string(),
            lang: "en-US".to_string(),
            max_headlines: crate::data::news::DEFAULT_MAX_HEADLINES,
            timeout_seconds: 10,
            retry_attempts: 2,
            max_concurrency: 4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            universe: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            output_dir: PathBuf::from("outputs"),
            news: NewsConfig::default(),
            factors: FactorConfig {
                source: FactorSource::Mock,
                seed: None,
            },
            thresholds: Thresholds::default(),
            report: ReportConfig {
                write_headlines: true,
                write_plot: true,
            },
        }
    }
}
