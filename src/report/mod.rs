//! Report sink: writes overlay artifacts to the output directory
//!
//! Any failure here is fatal for the run; there is no partial-success mode.

pub mod plot;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ReportConfig;
use crate::orchestrator::DailyRun;
use crate::overlay::OverlayTable;

pub const OVERLAY_FILE: &str = "overlay_results.csv";
pub const HEADLINES_FILE: &str = "headlines_raw.csv";
pub const PLOT_FILE: &str = "sentiment_vs_momentum_plot.svg";

/// Overlay table column order
pub const OVERLAY_COLUMNS: [&str; 8] = [
    "Ticker", "Size", "Value", "Momentum", "Quality", "Volatility", "Sentiment", "Insight",
];

/// Paths of the artifacts a run wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifacts {
    pub overlay: PathBuf,
    pub headlines: Option<PathBuf>,
    pub plot: Option<PathBuf>,
}

impl ReportArtifacts {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.overlay.as_path())
            .chain(self.headlines.as_deref())
            .chain(self.plot.as_deref())
    }
}

pub struct ReportSink {
    output_dir: PathBuf,
}

impl ReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if missing
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })
    }

    /// Write every artifact enabled in `options`
    pub fn write_all(&self, run: &DailyRun, options: &ReportConfig) -> Result<ReportArtifacts> {
        self.prepare()?;

        let overlay = self.write_overlay(&run.table)?;
        let headlines = if options.write_headlines {
            Some(self.write_headlines(run)?)
        } else {
            None
        };
        let plot = if options.write_plot {
            Some(self.write_plot(&run.table)?)
        } else {
            None
        };

        Ok(ReportArtifacts {
            overlay,
            headlines,
            plot,
        })
    }

    /// Overlay table, one row per joined ticker
    pub fn write_overlay(&self, table: &OverlayTable) -> Result<PathBuf> {
        let path = self.output_dir.join(OVERLAY_FILE);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(OVERLAY_COLUMNS)?;
        for row in &table.rows {
            writer.write_record([
                row.ticker.clone(),
                row.factors.size.to_string(),
                row.factors.value.to_string(),
                row.factors.momentum.to_string(),
                row.factors.quality.to_string(),
                row.factors.volatility.to_string(),
                row.sentiment.to_string(),
                row.insight.label().to_string(),
            ])?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), rows = table.len(), "Overlay table written");
        Ok(path)
    }

    /// Raw headlines as (Ticker, Headline) pairs. Tickers with no
    /// headlines contribute no rows.
    pub fn write_headlines(&self, run: &DailyRun) -> Result<PathBuf> {
        let path = self.output_dir.join(HEADLINES_FILE);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(["Ticker", "Headline"])?;
        let mut count = 0usize;
        for (ticker, headline) in run.headline_pairs() {
            writer.write_record([ticker, headline])?;
            count += 1;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), rows = count, "Raw headlines written");
        Ok(path)
    }

    /// Sentiment vs momentum scatter
    pub fn write_plot(&self, table: &OverlayTable) -> Result<PathBuf> {
        let path = self.output_dir.join(PLOT_FILE);
        plot::render_scatter(table, &path)
            .with_context(|| format!("Failed to render {}", path.display()))?;

        info!(path = %path.display(), "Diagnostic plot written");
        Ok(path)
    }
}
