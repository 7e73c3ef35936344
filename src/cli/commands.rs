use anyhow::{Context, Result};
use tracing::{info, warn};

use sentiment_overlay::{
    config::{Config, FactorSource},
    data::{validation::{normalize_universe, validate_symbol}, HeadlineSource, PolarityScorer, RssHeadlineSource, VaderScorer},
    orchestrator::{DailyOrchestrator, DailyRun},
    overlay::{classify as classify_pair, OverlayTable},
    report::{ReportArtifacts, ReportSink},
};

use super::RunOptions;

/// Apply `run` flags on top of the loaded configuration
pub fn apply_overrides(mut config: Config, options: &RunOptions) -> Result<Config> {
    if let Some(tickers) = &options.tickers {
        config.universe = normalize_universe(tickers.split(','))
            .context("Invalid --tickers value")?;
    }
    if let Some(dir) = &options.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(seed) = options.seed {
        config.factors.seed = Some(seed);
    }
    if let Some(path) = &options.factors {
        config.factors.source = FactorSource::File(path.clone());
    }
    if options.no_headlines {
        config.report.write_headlines = false;
    }
    if options.no_plot {
        config.report.write_plot = false;
    }

    config.validate()?;
    Ok(config)
}

/// Build the overlay for the configured universe and write all artifacts
pub async fn run(config: Config, options: RunOptions) -> Result<()> {
    let config = apply_overrides(config, &options)?;
    info!("🔍 Starting overlay run for {} tickers", config.universe.len());

    let orchestrator = DailyOrchestrator::new(config)?;
    let daily = orchestrator.run().await?;
    let config = orchestrator.config();

    display_headlines(&daily);
    display_overlay(&daily.table);

    let sink = ReportSink::new(&config.output_dir);
    let artifacts = sink
        .write_all(&daily, &config.report)
        .context("Failed to write overlay report")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&daily.table)?);
    }

    display_artifacts(&artifacts);
    Ok(())
}

/// Fetch and score headlines for a single ticker
pub async fn headlines(config: Config, ticker: String) -> Result<()> {
    let ticker = ticker.trim().to_ascii_uppercase();
    validate_symbol(&ticker)?;

    let source = RssHeadlineSource::new(&config.news)
        .context("Failed to build headline feed client")?;
    let scorer = VaderScorer::new();

    let items = source.fetch(&ticker).await;
    if items.is_empty() {
        warn!("No headlines available for {}", ticker);
    }

    println!("\n📰 {} HEADLINES", ticker);
    println!("========================");
    for headline in &items {
        println!("  {:>7.3}  {}", scorer.score_headline(headline), headline);
    }
    println!("\nAggregate sentiment: {:.3} ({} headlines)", scorer.aggregate(&items), items.len());

    Ok(())
}

/// Print the insight for one sentiment/momentum pair
pub fn classify(config: &Config, sentiment: f64, momentum: f64) {
    let insight = classify_pair(sentiment, momentum, &config.thresholds);
    println!("{}", insight);
}

fn display_headlines(daily: &DailyRun) {
    println!("\n------ Ticker Headlines ------");
    for (ticker, items) in &daily.headlines {
        println!("\n{}:", ticker);
        if items.is_empty() {
            println!("  (no headlines)");
        }
        for headline in items {
            println!("- {}", headline);
        }
    }
}

fn display_overlay(table: &OverlayTable) {
    println!("\n🎯 SENTIMENT-RISK OVERLAY");
    println!("========================");
    println!(
        "{:<7} {:>6} {:>6} {:>8} {:>7} {:>10} {:>9}  Insight",
        "Ticker", "Size", "Value", "Momentum", "Quality", "Volatility", "Sentiment"
    );
    for row in &table.rows {
        println!(
            "{:<7} {:>6.2} {:>6.2} {:>8.2} {:>7.2} {:>10.2} {:>9.3}  {}",
            row.ticker,
            row.factors.size,
            row.factors.value,
            row.factors.momentum,
            row.factors.quality,
            row.factors.volatility,
            row.sentiment,
            row.insight,
        );
    }

    println!("\n📊 INSIGHTS:");
    for (insight, count) in table.insight_counts() {
        println!("  • {}: {}", insight, count);
    }

    if !table.diff.is_empty() {
        println!("\n⚠️  EXCLUDED BY JOIN:");
        if !table.diff.missing_sentiment.is_empty() {
            println!("  • No sentiment: {}", table.diff.missing_sentiment.join(", "));
        }
        if !table.diff.missing_exposures.is_empty() {
            println!("  • No exposures: {}", table.diff.missing_exposures.join(", "));
        }
    }
}

fn display_artifacts(artifacts: &ReportArtifacts) {
    println!("\n✅ Overlay generated and saved to:");
    for path in artifacts.paths() {
        println!("  {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_overrides_replace_config_values() {
        let options = RunOptions {
            tickers: Some("jpm, jnj".to_string()),
            output_dir: Some(PathBuf::from("/tmp/out")),
            seed: Some(11),
            factors: Some(PathBuf::from("exposures.csv")),
            no_headlines: true,
            no_plot: true,
            json: false,
        };

        let config = apply_overrides(Config::default(), &options).unwrap();
        assert_eq!(config.universe, vec!["JPM", "JNJ"]);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.factors.seed, Some(11));
        assert_eq!(config.factors.source, FactorSource::File(PathBuf::from("exposures.csv")));
        assert!(!config.report.write_headlines);
        assert!(!config.report.write_plot);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply_overrides(Config::default(), &RunOptions::default()).unwrap();
        assert_eq!(config.universe.len(), 10);
        assert!(config.report.write_plot);
    }

    #[test]
    fn test_empty_ticker_override_is_rejected() {
        let options = RunOptions {
            tickers: Some(",".to_string()),
            ..RunOptions::default()
        };
        assert!(apply_overrides(Config::default(), &options).is_err());
    }
}
