//! Daily overlay orchestrator
//! Coordinates the pipeline: exposures + headlines → sentiment → overlay

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::{Config, FactorSource},
    data::{
        CsvFactorProvider, FactorProvider, FactorVector, Headline, HeadlineSource,
        MockFactorProvider, PolarityScorer, RssHeadlineSource, Ticker, VaderScorer,
    },
    overlay::{OverlayBuilder, OverlayTable},
};

/// Everything one run produced, ready for the report sink
#[derive(Debug, Clone, Serialize)]
pub struct DailyRun {
    pub generated_at: DateTime<Utc>,
    pub table: OverlayTable,
    pub headlines: BTreeMap<Ticker, Vec<Headline>>,
    pub sentiment: BTreeMap<Ticker, f64>,
}

impl DailyRun {
    /// Headlines flattened to (ticker, headline) pairs, in ticker order
    pub fn headline_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headlines.iter().flat_map(|(ticker, items)| {
            items.iter().map(move |h| (ticker.as_str(), h.as_str()))
        })
    }
}

/// Daily overlay orchestrator
pub struct DailyOrchestrator {
    config: Config,
    headline_source: Box<dyn HeadlineSource>,
    factor_provider: Box<dyn FactorProvider>,
    scorer: Box<dyn PolarityScorer>,
    builder: OverlayBuilder,
}

impl DailyOrchestrator {
    /// Create the orchestrator with the collaborators named by `config`
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing Daily Orchestrator");

        let headline_source = RssHeadlineSource::new(&config.news)
            .context("Failed to build headline feed client")?;

        let factor_provider: Box<dyn FactorProvider> = match &config.factors.source {
            FactorSource::Mock => Box::new(MockFactorProvider::new(config.factors.seed)),
            FactorSource::File(path) => Box::new(CsvFactorProvider::new(path)),
        };

        Ok(Self::with_collaborators(
            config,
            Box::new(headline_source),
            factor_provider,
            Box::new(VaderScorer::new()),
        ))
    }

    /// Create the orchestrator around explicit collaborators
    pub fn with_collaborators(
        config: Config,
        headline_source: Box<dyn HeadlineSource>,
        factor_provider: Box<dyn FactorProvider>,
        scorer: Box<dyn PolarityScorer>,
    ) -> Self {
        let builder = OverlayBuilder::new(config.thresholds);
        Self {
            config,
            headline_source,
            factor_provider,
            scorer,
            builder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full overlay pipeline for the configured universe
    pub async fn run(&self) -> Result<DailyRun> {
        let universe = &self.config.universe;
        info!(tickers = universe.len(), "🌅 Starting daily overlay run");

        // Step 1: Factor exposures
        info!(provider = self.factor_provider.name(), "📊 Loading factor exposures...");
        let exposures = self.load_exposures()?;

        // Step 2: Headlines
        info!(source = self.headline_source.name(), "📰 Fetching headlines...");
        let headlines = self.fetch_headlines().await;

        // Step 3: Sentiment
        info!("🧠 Scoring headline sentiment...");
        let sentiment = self.score_sentiment(&headlines);

        // Step 4: Join and classify
        let table = self.builder.build(&exposures, &sentiment);

        info!(
            rows = table.len(),
            watchlist = table.watchlist().count(),
            dropped = table.diff.dropped_count(),
            "✅ Overlay complete"
        );

        Ok(DailyRun {
            generated_at: Utc::now(),
            table,
            headlines,
            sentiment,
        })
    }

    fn load_exposures(&self) -> Result<BTreeMap<Ticker, FactorVector>> {
        let exposures = self
            .factor_provider
            .exposures(&self.config.universe)
            .with_context(|| format!("Factor provider '{}' failed", self.factor_provider.name()))?;
        debug!(count = exposures.len(), "Loaded factor exposures");
        Ok(exposures)
    }

    /// Fetch headlines for every ticker with a bounded number in flight.
    /// Never fails; tickers whose fetch failed map to an empty list.
    pub async fn fetch_headlines(&self) -> BTreeMap<Ticker, Vec<Headline>> {
        let source = self.headline_source.as_ref();
        let max_headlines = self.config.news.max_headlines;

        stream::iter(self.config.universe.iter().cloned())
            .map(|ticker| async move {
                let mut headlines = source.fetch(&ticker).await;
                headlines.truncate(max_headlines);
                debug!(ticker = %ticker, count = headlines.len(), "Headlines received");
                (ticker, headlines)
            })
            .buffer_unordered(self.config.news.max_concurrency)
            .collect()
            .await
    }

    /// Aggregate sentiment per ticker; tickers without headlines score 0.0
    pub fn score_sentiment(
        &self,
        headlines: &BTreeMap<Ticker, Vec<Headline>>,
    ) -> BTreeMap<Ticker, f64> {
        headlines
            .iter()
            .map(|(ticker, items)| (ticker.clone(), self.scorer.aggregate(items)))
            .collect()
    }
}
